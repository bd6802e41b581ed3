//! REST collections the client knows how to address

use scoutline_api::handlers::orders::StatusChange;
use scoutline_core::{NewOrder, NewProfile, Order, Profile, ProfileUpdate};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// A collection mounted under the API base
pub trait Resource {
    /// Collection path, e.g. `/profiles`
    const PATH: &'static str;
    /// Row type returned by the backend
    type Item: DeserializeOwned + Send;
    /// Body for `create`
    type Create: Serialize + Sync;
    /// Body for `update`
    type Update: Serialize + Sync;

    /// Identifier of a row
    fn id(item: &Self::Item) -> Uuid;

    /// Path of a single row
    fn item_path(id: Uuid) -> String {
        format!("{}/{id}", Self::PATH)
    }

    /// Path `update` sends its `PUT` to
    fn update_path(id: Uuid) -> String {
        Self::item_path(id)
    }
}

/// `/profiles`
#[derive(Debug, Clone, Copy)]
pub struct Profiles;

/// `/coaches`
#[derive(Debug, Clone, Copy)]
pub struct Coaches;

/// `/orders`
#[derive(Debug, Clone, Copy)]
pub struct Orders;

impl Resource for Profiles {
    const PATH: &'static str = "/profiles";
    type Item = Profile;
    type Create = NewProfile;
    type Update = ProfileUpdate;

    fn id(item: &Profile) -> Uuid {
        item.id
    }
}

impl Resource for Coaches {
    const PATH: &'static str = "/coaches";
    type Item = Profile;
    type Create = NewProfile;
    type Update = ProfileUpdate;

    fn id(item: &Profile) -> Uuid {
        item.id
    }
}

impl Resource for Orders {
    const PATH: &'static str = "/orders";
    type Item = Order;
    type Create = NewOrder;
    type Update = StatusChange;

    fn id(item: &Order) -> Uuid {
        item.id
    }

    fn update_path(id: Uuid) -> String {
        format!("{}/{id}/status", Self::PATH)
    }
}

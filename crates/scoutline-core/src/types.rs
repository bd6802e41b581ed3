//! Core data types for Scoutline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Generates `Display`/`FromStr` for a fieldless enum backed by lower-case text
macro_rules! text_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Text form used on the wire and in the database
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(crate::Error::validation(
                        stringify!($ty),
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

/// Whether a listing is for a player or a coach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Athlete looking for a club
    #[default]
    Player,
    /// Coach or staff member
    Coach,
}

text_enum!(ProfileKind { Player => "player", Coach => "coach" });

/// Moderation state of a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    /// Awaiting review; not publicly visible
    #[default]
    Pending,
    /// Publicly listed
    Approved,
    /// Refused by a moderator
    Rejected,
    /// Temporarily withdrawn from listings
    Hidden,
}

text_enum!(ProfileStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Hidden => "hidden",
});

/// Media file attached to a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Unique identifier
    pub id: Uuid,
    /// Original client-side filename (sanitized)
    pub filename: String,
    /// MIME type as sent by the client
    pub content_type: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Storage path relative to the media directory
    pub path: String,
    /// When the upload finished
    pub uploaded_at: DateTime<Utc>,
}

/// A player or coach listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier
    pub id: Uuid,
    /// Player or coach
    pub kind: ProfileKind,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Sport key, e.g. `football`
    pub sport: String,
    /// Position (players) or role (coaches) key, e.g. `striker`
    pub position: String,
    /// Nationality as a lower-case ISO 3166 alpha-2 code
    pub nationality: String,
    /// Height in centimetres
    pub height_cm: Option<u16>,
    /// Weight in kilograms
    pub weight_kg: Option<u16>,
    /// Free-text presentation
    pub bio: Option<String>,
    /// Uploaded photos and videos
    pub media: Vec<MediaAttachment>,
    /// Moderation state
    pub status: ProfileStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build a pending profile from a creation payload
    #[must_use]
    pub fn from_new(new: NewProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind: new.kind,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            date_of_birth: new.date_of_birth,
            sport: new.sport,
            position: new.position,
            nationality: new.nationality.to_ascii_lowercase(),
            height_cm: new.height_cm,
            weight_kg: new.weight_kg,
            bio: new.bio,
            media: Vec::new(),
            status: ProfileStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = Some(date_of_birth);
        }
        if let Some(sport) = update.sport {
            self.sport = sport;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(nationality) = update.nationality {
            self.nationality = nationality.to_ascii_lowercase();
        }
        if let Some(height_cm) = update.height_cm {
            self.height_cm = Some(height_cm);
        }
        if let Some(weight_kg) = update.weight_kg {
            self.weight_kg = Some(weight_kg);
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    /// Display name used by tables and search
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProfile {
    /// Player or coach
    #[serde(default)]
    pub kind: ProfileKind,

    /// Given name
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,

    /// Family name
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,

    /// Contact email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    /// Contact phone
    #[validate(length(min = 6, max = 20, message = "Enter a valid phone number"))]
    pub phone: Option<String>,

    /// Date of birth
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: Option<NaiveDate>,

    /// Sport key
    #[validate(custom(function = "validate_key_segment"))]
    pub sport: String,

    /// Position or role key
    #[validate(custom(function = "validate_key_segment"))]
    pub position: String,

    /// Nationality code
    #[validate(custom(function = "validate_country_code"))]
    pub nationality: String,

    /// Height in centimetres
    #[validate(range(min = 100, max = 250, message = "Height must be between 100 and 250 cm"))]
    pub height_cm: Option<u16>,

    /// Weight in kilograms
    #[validate(range(min = 30, max = 200, message = "Weight must be between 30 and 200 kg"))]
    pub weight_kg: Option<u16>,

    /// Free-text presentation
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    /// Given name
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: Option<String>,
    /// Family name
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: Option<String>,
    /// Contact email
    #[validate(email)]
    pub email: Option<String>,
    /// Contact phone
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    /// Date of birth
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: Option<NaiveDate>,
    /// Sport key
    #[validate(custom(function = "validate_key_segment"))]
    pub sport: Option<String>,
    /// Position or role key
    #[validate(custom(function = "validate_key_segment"))]
    pub position: Option<String>,
    /// Nationality code
    #[validate(custom(function = "validate_country_code"))]
    pub nationality: Option<String>,
    /// Height in centimetres
    #[validate(range(min = 100, max = 250))]
    pub height_cm: Option<u16>,
    /// Weight in kilograms
    #[validate(range(min = 30, max = 200))]
    pub weight_kg: Option<u16>,
    /// Free-text presentation
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    /// Moderation state
    pub status: Option<ProfileStatus>,
}

/// Listing plan bought by an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Standard listing
    Basic,
    /// Highlighted listing
    Premium,
    /// Highlighted listing with scouting report
    Elite,
}

text_enum!(Plan { Basic => "basic", Premium => "premium", Elite => "elite" });

/// Payment state of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment
    #[default]
    Pending,
    /// Payment captured
    Paid,
    /// Payment declined
    Failed,
    /// Payment returned to the customer
    Refunded,
}

text_enum!(OrderStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

/// A paid listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,
    /// Profile the listing is for
    pub profile_id: Uuid,
    /// Billing email
    pub customer_email: String,
    /// Purchased plan
    pub plan: Plan,
    /// Amount in minor currency units
    pub amount_cents: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Payment state
    pub status: OrderStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from a creation payload
    #[must_use]
    pub fn from_new(new: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            profile_id: new.profile_id,
            customer_email: new.customer_email,
            plan: new.plan,
            amount_cents: new.amount_cents,
            currency: new.currency.to_ascii_uppercase(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrder {
    /// Profile the listing is for
    pub profile_id: Uuid,
    /// Billing email
    #[validate(email)]
    pub customer_email: String,
    /// Purchased plan
    pub plan: Plan,
    /// Amount in minor currency units
    #[validate(range(min = 0))]
    pub amount_cents: i64,
    /// ISO 4217 currency code
    #[validate(length(equal = 3))]
    pub currency: String,
}

/// Aggregated payment figures for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMetrics {
    /// Number of orders of any status
    pub total_orders: u64,
    /// Orders with captured payment
    pub paid_orders: u64,
    /// Orders awaiting payment
    pub pending_orders: u64,
    /// Orders with declined payment
    pub failed_orders: u64,
    /// Orders refunded to the customer
    pub refunded_orders: u64,
    /// Sum of paid order amounts
    pub revenue_cents: i64,
    /// Mean paid order amount, 0 with no paid orders
    pub average_order_cents: i64,
}

impl PaymentMetrics {
    /// Aggregate metrics over a set of orders
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut metrics = Self::default();
        for order in orders {
            metrics.total_orders += 1;
            match order.status {
                OrderStatus::Paid => {
                    metrics.paid_orders += 1;
                    metrics.revenue_cents += order.amount_cents;
                }
                OrderStatus::Pending => metrics.pending_orders += 1,
                OrderStatus::Failed => metrics.failed_orders += 1,
                OrderStatus::Refunded => metrics.refunded_orders += 1,
            }
        }
        metrics.average_order_cents = i64::try_from(metrics.paid_orders)
            .ok()
            .filter(|paid| *paid > 0)
            .map_or(0, |paid| metrics.revenue_cents / paid);
        metrics
    }
}

/// Search-engine metadata republished to the public site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SeoSettings {
    /// Default page title
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    /// Meta description
    #[validate(length(max = 320))]
    pub description: String,
    /// Meta keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Open Graph image URL
    #[validate(url)]
    pub og_image: Option<String>,
}

/// Site-wide settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Public site name
    #[validate(length(min = 1, max = 100))]
    pub site_name: String,
    /// Contact address shown on the site
    #[validate(email)]
    pub contact_email: String,
    /// SEO metadata
    #[validate(nested)]
    pub seo: SeoSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_name: "Scoutline".to_string(),
            contact_email: "contact@scoutline.example".to_string(),
            seo: SeoSettings {
                title: "Scoutline - sports talent marketplace".to_string(),
                description: "Find players and coaches from around the world.".to_string(),
                keywords: vec!["football".to_string(), "scouting".to_string()],
                og_image: None,
            },
        }
    }
}

const MAX_NAME_CHARS: usize = 100;

fn validate_person_name(value: &str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(format!("{label} is required").into()));
    }
    if value.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new("length")
            .with_message(format!("{label} must be at most {MAX_NAME_CHARS} characters").into()));
    }
    Ok(())
}

/// Given name: not blank, at most 100 characters
///
/// # Errors
///
/// `required` for a blank name, `length` for an overlong one.
pub fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    validate_person_name(value, "First name")
}

/// Family name: not blank, at most 100 characters
///
/// # Errors
///
/// `required` for a blank name, `length` for an overlong one.
pub fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    validate_person_name(value, "Last name")
}

/// Translation key segments are camelCase identifiers without dots
///
/// # Errors
///
/// `invalid_key` when the value is not a key segment.
pub fn validate_key_segment(value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value.len() <= 50
        && value.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && value.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_key").with_message("Select a value from the list".into()))
    }
}

/// Two-letter nationality code
///
/// # Errors
///
/// `invalid_country` for anything but two ASCII letters.
pub fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_country")
            .with_message("Select a nationality".into()))
    }
}

/// Birth dates between 1900-01-01 and today
///
/// # Errors
///
/// `invalid_birth_date` outside that range.
pub fn validate_birth_date(value: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    let oldest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    if *value > today || *value < oldest {
        Err(ValidationError::new("invalid_birth_date")
            .with_message("Enter a valid date of birth".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::cast_possible_wrap
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    pub(crate) fn sample_new_profile() -> NewProfile {
        NewProfile {
            kind: ProfileKind::Player,
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(2001, 4, 12),
            sport: "football".to_string(),
            position: "centerBack".to_string(),
            nationality: "NG".to_string(),
            height_cm: Some(182),
            weight_kg: Some(76),
            bio: None,
        }
    }

    fn order(status: OrderStatus, amount_cents: i64) -> Order {
        let mut order = Order::from_new(NewOrder {
            profile_id: Uuid::new_v4(),
            customer_email: "club@example.com".to_string(),
            plan: Plan::Premium,
            amount_cents,
            currency: "eur".to_string(),
        });
        order.status = status;
        order
    }

    #[test]
    fn test_new_profile_validates() {
        assert!(sample_new_profile().validate().is_ok());
    }

    #[rstest]
    #[case("football", true)]
    #[case("centerBack", true)]
    #[case("", false)]
    #[case("positions.football", false)]
    #[case("Striker", false)]
    #[case("wing back", false)]
    fn test_key_segment_rule(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(validate_key_segment(value).is_ok(), valid);
    }

    #[rstest]
    #[case("", "First name is required")]
    #[case("   ", "First name is required")]
    #[case(&"a".repeat(101), "First name must be at most 100 characters")]
    fn test_first_name_messages(#[case] name: &str, #[case] expected: &str) {
        let mut profile = sample_new_profile();
        profile.first_name = name.to_string();

        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        let message = fields["first_name"][0].message.as_deref();
        assert_eq!(message, Some(expected));
    }

    #[test]
    fn test_last_name_length_message() {
        let mut profile = sample_new_profile();
        profile.last_name = "é".repeat(100);
        assert!(profile.validate().is_ok());

        profile.last_name.push('é');
        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["last_name"][0].code, "length");
        assert_eq!(
            fields["last_name"][0].message.as_deref(),
            Some("Last name must be at most 100 characters")
        );
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let update = ProfileUpdate {
            first_name: Some(" ".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(update.validate().unwrap_err().field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_new_profile_rejects_bad_fields() {
        let mut profile = sample_new_profile();
        profile.email = "not-an-email".to_string();
        profile.nationality = "NGA".to_string();
        profile.height_cm = Some(20);

        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("nationality"));
        assert!(fields.contains_key("height_cm"));
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut profile = sample_new_profile();
        profile.date_of_birth = Some(Utc::now().date_naive() + chrono::Duration::days(2));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_from_new_is_pending() {
        let profile = Profile::from_new(sample_new_profile());

        assert_eq!(profile.status, ProfileStatus::Pending);
        assert_eq!(profile.nationality, "ng");
        assert!(profile.media.is_empty());
        assert_eq!(profile.full_name(), "Ada Okafor");
    }

    #[test]
    fn test_profile_apply_partial_update() {
        let mut profile = Profile::from_new(sample_new_profile());
        let before = profile.updated_at;

        profile.apply(ProfileUpdate {
            position: Some("striker".to_string()),
            status: Some(ProfileStatus::Approved),
            ..ProfileUpdate::default()
        });

        assert_eq!(profile.position, "striker");
        assert_eq!(profile.status, ProfileStatus::Approved);
        assert_eq!(profile.first_name, "Ada");
        assert!(profile.updated_at >= before);
    }

    #[rstest]
    #[case("player", ProfileKind::Player)]
    #[case("coach", ProfileKind::Coach)]
    fn test_profile_kind_text(#[case] text: &str, #[case] kind: ProfileKind) {
        assert_eq!(text.parse::<ProfileKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), text);
    }

    #[test]
    fn test_unknown_status_text_rejected() {
        assert!("archived".parse::<ProfileStatus>().is_err());
        assert!("PAID".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&ProfileStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let status: OrderStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(status, OrderStatus::Refunded);
    }

    #[test]
    fn test_payment_metrics_counts_paid_revenue_only() {
        let orders = vec![
            order(OrderStatus::Paid, 4_900),
            order(OrderStatus::Paid, 9_900),
            order(OrderStatus::Pending, 4_900),
            order(OrderStatus::Refunded, 19_900),
            order(OrderStatus::Failed, 4_900),
        ];

        let metrics = PaymentMetrics::from_orders(&orders);
        assert_eq!(metrics.total_orders, 5);
        assert_eq!(metrics.paid_orders, 2);
        assert_eq!(metrics.pending_orders, 1);
        assert_eq!(metrics.refunded_orders, 1);
        assert_eq!(metrics.failed_orders, 1);
        assert_eq!(metrics.revenue_cents, 14_800);
        assert_eq!(metrics.average_order_cents, 7_400);
    }

    #[test]
    fn test_payment_metrics_empty() {
        let metrics = PaymentMetrics::from_orders(&[]);
        assert_eq!(metrics, PaymentMetrics::default());
    }

    fn any_status() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Paid),
            Just(OrderStatus::Failed),
            Just(OrderStatus::Refunded),
        ]
    }

    proptest! {
        #[test]
        fn prop_payment_metrics_partition(
            rows in prop::collection::vec((any_status(), 0i64..1_000_000), 0..40)
        ) {
            let orders: Vec<Order> = rows.iter().map(|&(status, amount)| order(status, amount)).collect();
            let metrics = PaymentMetrics::from_orders(&orders);

            prop_assert_eq!(metrics.total_orders, orders.len() as u64);
            prop_assert_eq!(
                metrics.paid_orders + metrics.pending_orders + metrics.failed_orders + metrics.refunded_orders,
                metrics.total_orders
            );

            let paid: Vec<i64> = rows
                .iter()
                .filter(|(status, _)| *status == OrderStatus::Paid)
                .map(|&(_, amount)| amount)
                .collect();
            let revenue: i64 = paid.iter().sum();
            prop_assert_eq!(metrics.revenue_cents, revenue);
            if paid.is_empty() {
                prop_assert_eq!(metrics.average_order_cents, 0);
            } else {
                prop_assert_eq!(metrics.average_order_cents, revenue / paid.len() as i64);
            }
        }

        #[test]
        fn prop_order_status_text_round_trip(status in any_status()) {
            prop_assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
            prop_assert_eq!(status.to_string(), status.as_str());
        }

        #[test]
        fn prop_plan_and_profile_status_round_trip(
            plan in prop_oneof![Just(Plan::Basic), Just(Plan::Premium), Just(Plan::Elite)],
            status in prop_oneof![
                Just(ProfileStatus::Pending),
                Just(ProfileStatus::Approved),
                Just(ProfileStatus::Rejected),
                Just(ProfileStatus::Hidden),
            ],
        ) {
            prop_assert_eq!(plan.as_str().parse::<Plan>().unwrap(), plan);
            prop_assert_eq!(status.as_str().parse::<ProfileStatus>().unwrap(), status);
        }

        #[test]
        fn prop_unknown_text_rejected(text in "[a-z]{1,12}") {
            let known = ["pending", "paid", "failed", "refunded"];
            prop_assume!(!known.contains(&text.as_str()));
            prop_assert!(text.parse::<OrderStatus>().is_err());
        }
    }

    #[test]
    fn test_order_currency_uppercased() {
        assert_eq!(order(OrderStatus::Pending, 100).currency, "EUR");
    }

    #[test]
    fn test_default_settings_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_rejects_bad_og_image() {
        let mut settings = Settings::default();
        settings.seo.og_image = Some("not a url".to_string());
        assert!(settings.validate().is_err());
    }
}

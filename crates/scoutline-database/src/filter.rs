//! Listing filters, sort keys and result pages

use scoutline_core::{Error, Order, OrderStatus, Profile, ProfileKind, ProfileStatus};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, str::FromStr};
use uuid::Uuid;

/// Sort direction for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::validation("order", format!("unknown sort order '{other}'"))),
        }
    }
}

/// Whitelisted profile sort columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileSort {
    /// Registration time
    #[default]
    CreatedAt,
    /// Family name
    LastName,
    /// Given name
    FirstName,
    /// Sport key
    Sport,
    /// Moderation state
    Status,
}

impl ProfileSort {
    /// Column name in the `profiles` table
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::Sport => "sport",
            Self::Status => "status",
        }
    }

    fn compare(self, a: &Profile, b: &Profile) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::LastName => a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()),
            Self::FirstName => a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()),
            Self::Sport => a.sport.cmp(&b.sport),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

impl FromStr for ProfileSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "last_name" => Ok(Self::LastName),
            "first_name" => Ok(Self::FirstName),
            "sport" => Ok(Self::Sport),
            "status" => Ok(Self::Status),
            other => Err(Error::validation("sort", format!("cannot sort profiles by '{other}'"))),
        }
    }
}

/// Whitelisted order sort columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    /// Creation time
    #[default]
    CreatedAt,
    /// Amount
    Amount,
    /// Payment state
    Status,
}

impl OrderSort {
    /// Column name in the `orders` table
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Amount => "amount_cents",
            Self::Status => "status",
        }
    }

    fn compare(self, a: &Order, b: &Order) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Amount => a.amount_cents.cmp(&b.amount_cents),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

impl FromStr for OrderSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "amount_cents" => Ok(Self::Amount),
            "status" => Ok(Self::Status),
            other => Err(Error::validation("sort", format!("cannot sort orders by '{other}'"))),
        }
    }
}

/// Profile listing criteria
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    /// Restrict to players or coaches
    pub kind: Option<ProfileKind>,
    /// Restrict to a moderation state
    pub status: Option<ProfileStatus>,
    /// Restrict to a sport key
    pub sport: Option<String>,
    /// Case-insensitive substring over name, email, sport, position and nationality
    pub search: Option<String>,
    /// Sort column
    pub sort: ProfileSort,
    /// Sort direction
    pub direction: SortDirection,
    /// Page size
    pub limit: u32,
    /// Rows to skip
    pub offset: u32,
}

impl ProfileFilter {
    /// Whether a profile satisfies every criterion except paging
    #[must_use]
    pub fn matches(&self, profile: &Profile) -> bool {
        if self.kind.is_some_and(|kind| kind != profile.kind) {
            return false;
        }
        if self.status.is_some_and(|status| status != profile.status) {
            return false;
        }
        if self.sport.as_deref().is_some_and(|sport| sport != profile.sport) {
            return false;
        }
        match self.search_term() {
            Some(term) => [
                profile.first_name.as_str(),
                profile.last_name.as_str(),
                profile.email.as_str(),
                profile.sport.as_str(),
                profile.position.as_str(),
                profile.nationality.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
                || profile.full_name().to_lowercase().contains(&term),
            None => true,
        }
    }

    /// Trimmed, lower-cased search term; `None` when blank
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        normalized_search(self.search.as_deref())
    }

    /// Order two profiles by the sort key, ties broken by id
    #[must_use]
    pub fn compare(&self, a: &Profile, b: &Profile) -> Ordering {
        self.direction
            .apply(self.sort.compare(a, b))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Order listing criteria
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to a payment state
    pub status: Option<OrderStatus>,
    /// Restrict to one profile's orders
    pub profile_id: Option<Uuid>,
    /// Case-insensitive substring over the customer email
    pub search: Option<String>,
    /// Sort column
    pub sort: OrderSort,
    /// Sort direction
    pub direction: SortDirection,
    /// Page size
    pub limit: u32,
    /// Rows to skip
    pub offset: u32,
}

impl OrderFilter {
    /// Whether an order satisfies every criterion except paging
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|status| status != order.status) {
            return false;
        }
        if self.profile_id.is_some_and(|id| id != order.profile_id) {
            return false;
        }
        self.search_term().is_none_or(|term| {
            order.customer_email.to_lowercase().contains(&term)
        })
    }

    /// Trimmed, lower-cased search term; `None` when blank
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        normalized_search(self.search.as_deref())
    }

    /// Order two orders by the sort key, ties broken by id
    #[must_use]
    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        self.direction
            .apply(self.sort.compare(a, b))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn normalized_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// Escape `%`, `_` and `\` so a term matches literally inside `ILIKE`
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// One page of a listing plus the unpaged total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Rows matching the filter across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Sort, count and slice a full candidate set
    pub fn paginate<F>(mut rows: Vec<T>, compare: F, limit: u32, offset: u32) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        rows.sort_by(compare);
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Self { items, total }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use scoutline_core::NewProfile;

    fn profile(first: &str, last: &str, sport: &str) -> Profile {
        Profile::from_new(NewProfile {
            kind: ProfileKind::Player,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            date_of_birth: None,
            sport: sport.to_string(),
            position: "striker".to_string(),
            nationality: "br".to_string(),
            height_cm: None,
            weight_kg: None,
            bio: None,
        })
    }

    #[rstest]
    #[case("created_at", ProfileSort::CreatedAt)]
    #[case("last_name", ProfileSort::LastName)]
    #[case("status", ProfileSort::Status)]
    fn test_profile_sort_parse(#[case] text: &str, #[case] sort: ProfileSort) {
        assert_eq!(text.parse::<ProfileSort>().unwrap(), sort);
        assert_eq!(sort.column(), text);
    }

    #[test]
    fn test_sort_whitelist_rejects_injection() {
        assert!("email; DROP TABLE profiles".parse::<ProfileSort>().is_err());
        assert!("id".parse::<OrderSort>().is_err());
        assert!("DESC".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_search_matches_name_and_email() {
        let p = profile("Marta", "Vieira", "football");
        let filter = |term: &str| ProfileFilter {
            search: Some(term.to_string()),
            ..ProfileFilter::default()
        };

        assert!(filter("marta").matches(&p));
        assert!(filter("  VIEIRA ").matches(&p));
        assert!(filter("marta vieira").matches(&p));
        assert!(filter("example.com").matches(&p));
        assert!(filter("").matches(&p));
        assert!(!filter("basketball").matches(&p));
    }

    #[test]
    fn test_filter_by_kind_and_sport() {
        let p = profile("Marta", "Vieira", "football");

        let coaches = ProfileFilter {
            kind: Some(ProfileKind::Coach),
            ..ProfileFilter::default()
        };
        assert!(!coaches.matches(&p));

        let football = ProfileFilter {
            sport: Some("football".to_string()),
            status: Some(ProfileStatus::Pending),
            ..ProfileFilter::default()
        };
        assert!(football.matches(&p));
    }

    #[test]
    fn test_paginate_sorts_and_slices() {
        let rows = vec![
            profile("Carla", "Zeta", "football"),
            profile("Ana", "Alpha", "football"),
            profile("Bea", "Mid", "football"),
        ];
        let filter = ProfileFilter {
            sort: ProfileSort::LastName,
            direction: SortDirection::Asc,
            ..ProfileFilter::default()
        };

        let page = Page::paginate(rows, |a, b| filter.compare(a, b), 2, 1);
        assert_eq!(page.total, 3);
        let names: Vec<_> = page.items.iter().map(|p| p.last_name.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Zeta"]);
    }

    #[test]
    fn test_paginate_offset_past_end() {
        let page = Page::paginate(vec![1, 2, 3], Ord::cmp, 10, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}

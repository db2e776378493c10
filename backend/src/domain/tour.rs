//! Tour records, prices and the date rules applied to them.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Days, NaiveDate, Utc};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::domain::validation::{optional_text, required_text};
use crate::domain::{FieldErrors, ImageDescriptor, PrincipalId, TourId, validate_image};

pub const TITLE_MAX: usize = 255;
pub const PLACE_MAX: usize = 100;
pub const GUIDE_MAX: usize = 100;
pub const BOOKING_MEANS_MAX: usize = 255;
/// Stored when no guide has been assigned yet.
pub const GUIDE_UNKNOWN: &str = "currently unknown";

const PRICE_MAX_DIGITS: usize = 4;
const PRICE_DECIMAL_PLACES: usize = 2;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub const START_TOO_EARLY: &str = "Start date must be tomorrow or later";
pub const END_BEFORE_START: &str = "End date must be after start date";
pub const INVALID_DATE: &str = "Invalid date, use the YYYY-MM-DD format";

/// Tour price in hundredths, at most `99.99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(u32);

static PRICE_RE: OnceLock<Regex> = OnceLock::new();

fn price_regex() -> &'static Regex {
    PRICE_RE.get_or_init(|| {
        Regex::new(r"^(-?)(\d*)(?:\.(\d*))?$")
            .unwrap_or_else(|error| panic!("price regex failed to compile: {error}"))
    })
}

impl Price {
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> u32 {
        self.0
    }

    /// Parse decimal text such as `"12.5"` or `"0.00"`.
    ///
    /// # Examples
    /// ```
    /// use tourlens::domain::Price;
    ///
    /// assert_eq!(Price::parse("12.5").map(Price::cents), Ok(1250));
    /// assert!(Price::parse("123.45").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, &'static str> {
        const INVALID: &str = "A valid number is required.";
        let raw = raw.trim();
        let captures = price_regex().captures(raw).ok_or(INVALID)?;
        let whole = captures.get(2).map_or("", |m| m.as_str());
        let fraction = captures.get(3).map_or("", |m| m.as_str());
        if whole.is_empty() && fraction.is_empty() {
            return Err(INVALID);
        }
        if captures.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            return Err("Ensure this value is greater than or equal to 0.");
        }

        let significant = whole.trim_start_matches('0');
        if significant.len() + fraction.len() > PRICE_MAX_DIGITS {
            return Err("Ensure that there are no more than 4 digits in total.");
        }
        if fraction.len() > PRICE_DECIMAL_PLACES {
            return Err("Ensure that there are no more than 2 decimal places.");
        }
        if significant.len() > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
            return Err("Ensure that there are no more than 2 digits before the decimal point.");
        }

        let whole: u32 = if significant.is_empty() {
            0
        } else {
            significant.parse().map_err(|_| INVALID)?
        };
        let fraction: u32 = format!("{fraction:0<2}").parse().map_err(|_| INVALID)?;
        Ok(Self(whole * 100 + fraction))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A stored tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    pub id: TourId,
    pub owner: PrincipalId,
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub price: Price,
    pub guide: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied tour fields before validation.
#[derive(Debug, Clone, Default)]
pub struct TourForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub price: Option<String>,
    pub guide: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub booking_means: Option<String>,
    pub image: Option<ImageDescriptor>,
}

/// Validated mutable fields of a tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourDraft {
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub price: Price,
    pub guide: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: String,
    pub image: Option<ImageDescriptor>,
}

fn parse_date(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let Some(raw) = raw else {
        errors.push(field, crate::domain::validation::REQUIRED);
        return None;
    };
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, INVALID_DATE);
            None
        }
    }
}

impl TourForm {
    /// Validate every field.
    ///
    /// `today` anchors the "tomorrow or later" rule. When updating,
    /// `current_start` is the stored start date; an unchanged start date is
    /// not re-checked against `today`, so running tours stay editable.
    pub fn validate(
        self,
        today: NaiveDate,
        current_start: Option<NaiveDate>,
    ) -> Result<TourDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", self.title, Some(TITLE_MAX));
        let description = optional_text(&mut errors, "description", self.description, None, "");
        let country = required_text(&mut errors, "country", self.country, Some(PLACE_MAX));
        let city = required_text(&mut errors, "city", self.city, Some(PLACE_MAX));
        let guide = optional_text(&mut errors, "guide", self.guide, Some(GUIDE_MAX), GUIDE_UNKNOWN);
        let booking_means = required_text(
            &mut errors,
            "booking_means",
            self.booking_means,
            Some(BOOKING_MEANS_MAX),
        );

        let price = match self.price.as_deref().map(Price::parse) {
            None => Price::default(),
            Some(Ok(price)) => price,
            Some(Err(message)) => {
                errors.push("price", message);
                Price::default()
            }
        };

        let start_date = parse_date(&mut errors, "start_date", self.start_date.as_deref());
        let end_date = parse_date(&mut errors, "end_date", self.end_date.as_deref());

        if let Some(start) = start_date.filter(|start| current_start != Some(*start)) {
            let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
            if start < tomorrow {
                errors.push("start_date", START_TOO_EARLY);
            }
        }
        if matches!((start_date, end_date), (Some(start), Some(end)) if end < start) {
            errors.push("end_date", END_BEFORE_START);
        }

        if let Some(image) = &self.image {
            validate_image(&mut errors, "image", image);
        }

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(TourDraft {
                title,
                description,
                country,
                city,
                price,
                guide,
                start_date,
                end_date,
                booking_means,
                image: self.image,
            }),
            _ => Err(errors),
        }
    }
}

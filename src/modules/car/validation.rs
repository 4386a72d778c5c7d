use super::dto::{Car, CarFormDto};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// a single failed validation rule for a named request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> FieldError {
        FieldError { field, message }
    }
}

const MSG_BLANK: &str = "must not be empty";
const MSG_POSITIVE_NUMBER: &str = "must be a positive number";
const MSG_YEAR: &str = "must be greater than 1885";
const MSG_ISO_8601: &str = "must be a valid ISO 8601 date";
const MSG_BOOLEAN: &str = "must be a boolean";
const MSG_JSON_ARRAY: &str = "must be a valid JSON array";

/// A single form field rule: a sanitizer turning the raw (trimmed) token into
/// its target type and the message reported when the sanitizer rejects it.
///
/// Sanitizers are pure, running the same rule on the same token always yields
/// the same outcome.
struct Rule<T> {
    field: &'static str,
    message: &'static str,
    sanitize: fn(&str) -> Option<T>,
}

impl<T> Rule<T> {
    /// runs the rule over a required field, pushing a `FieldError` if the raw
    /// value is absent, blank or rejected by the sanitizer
    fn run(&self, raw: &Option<String>, errors: &mut Vec<FieldError>) -> Option<T> {
        let trimmed = raw.as_deref().map(str::trim).unwrap_or_default();

        if trimmed.is_empty() {
            errors.push(FieldError::new(self.field, MSG_BLANK));
            return None;
        }

        let sanitized = (self.sanitize)(trimmed);

        if sanitized.is_none() {
            errors.push(FieldError::new(self.field, self.message));
        }

        sanitized
    }

    /// same as `run` but a absent or blank field is fine and yields `None`
    /// without any error
    fn run_optional(&self, raw: &Option<String>, errors: &mut Vec<FieldError>) -> Option<T> {
        let trimmed = raw.as_deref().map(str::trim).unwrap_or_default();

        if trimmed.is_empty() {
            return None;
        }

        let sanitized = (self.sanitize)(trimmed);

        if sanitized.is_none() {
            errors.push(FieldError::new(self.field, self.message));
        }

        sanitized
    }
}

// the car form rule set as data, field names match the multipart part names
const PLATE: Rule<String> = Rule {
    field: "plate",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const MANUFACTURE: Rule<String> = Rule {
    field: "manufacture",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const MODEL: Rule<String> = Rule {
    field: "model",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const RENT_PER_DAY: Rule<i32> = Rule {
    field: "rentPerDay",
    message: MSG_POSITIVE_NUMBER,
    sanitize: positive_int,
};

const CAPACITY: Rule<i32> = Rule {
    field: "capacity",
    message: MSG_POSITIVE_NUMBER,
    sanitize: positive_int,
};

const DESCRIPTION: Rule<String> = Rule {
    field: "description",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const AVAILABLE_AT: Rule<DateTime<Utc>> = Rule {
    field: "availableAt",
    message: MSG_ISO_8601,
    sanitize: iso_date_time,
};

const TRANSMISSION: Rule<String> = Rule {
    field: "transmission",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const AVAILABLE: Rule<bool> = Rule {
    field: "available",
    message: MSG_BOOLEAN,
    sanitize: bool_literal,
};

const CAR_TYPE: Rule<String> = Rule {
    field: "type",
    message: MSG_BLANK,
    sanitize: owned_text,
};

const YEAR: Rule<i32> = Rule {
    field: "year",
    message: MSG_YEAR,
    sanitize: year_after_first_car,
};

const OPTIONS: Rule<Vec<Value>> = Rule {
    field: "options",
    message: MSG_JSON_ARRAY,
    sanitize: json_array,
};

const SPECS: Rule<Vec<Value>> = Rule {
    field: "specs",
    message: MSG_JSON_ARRAY,
    sanitize: json_array,
};

fn owned_text(raw: &str) -> Option<String> {
    Some(String::from(raw))
}

fn positive_int(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|parsed| *parsed > 0)
}

fn year_after_first_car(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|parsed| *parsed > 1885)
}

/// parses the literal strings "true" / "false", case insensitively, anything
/// else is not considered a boolean
fn bool_literal(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// parses a full RFC 3339 timestamp, a naive date time or a plain date,
/// normalizing all of them to UTC
fn iso_date_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Utc));
    }

    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&date_time));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| Utc.from_utc_datetime(&date_time))
}

fn json_array(raw: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Runs every field rule over the form, never short circuiting, so a request
/// with many broken fields reports all of them at once.
pub fn validate_car_form(form: &CarFormDto) -> Result<Car, Vec<FieldError>> {
    let mut errors: Vec<FieldError> = Vec::new();

    let plate = PLATE.run(&form.plate, &mut errors);
    let manufacture = MANUFACTURE.run(&form.manufacture, &mut errors);
    let model = MODEL.run(&form.model, &mut errors);
    let rent_per_day = RENT_PER_DAY.run(&form.rent_per_day, &mut errors);
    let capacity = CAPACITY.run(&form.capacity, &mut errors);
    let description = DESCRIPTION.run(&form.description, &mut errors);
    let available_at = AVAILABLE_AT.run(&form.available_at, &mut errors);
    let transmission = TRANSMISSION.run(&form.transmission, &mut errors);
    let available = AVAILABLE.run(&form.available, &mut errors);
    let car_type = CAR_TYPE.run(&form.car_type, &mut errors);
    let year = YEAR.run(&form.year, &mut errors);
    let options = OPTIONS.run_optional(&form.options, &mut errors);
    let specs = SPECS.run_optional(&form.specs, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    // every rule that returned None pushed an error, so all required values are present here
    Ok(Car {
        plate: plate.unwrap(),
        manufacture: manufacture.unwrap(),
        model: model.unwrap(),
        rent_per_day: rent_per_day.unwrap(),
        capacity: capacity.unwrap(),
        description: description.unwrap(),
        available_at: available_at.unwrap(),
        transmission: transmission.unwrap(),
        available: available.unwrap(),
        car_type: car_type.unwrap(),
        year: year.unwrap(),
        options,
        specs,
        image: None,
    })
}

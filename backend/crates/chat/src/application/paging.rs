//! Page parameter validation shared by the list use cases

use kernel::error::app_error::FieldViolation;

use crate::application::config::PageLimits;
use crate::domain::value_object::page::PageRequest;

/// Turn raw query values into a [`PageRequest`], collecting violations.
pub(crate) fn page_request(
    page: Option<i64>,
    size: Option<i64>,
    limits: PageLimits,
    violations: &mut Vec<FieldViolation>,
) -> Option<PageRequest> {
    let page = page.unwrap_or(0);
    let size = size.unwrap_or(i64::from(limits.default_size));

    let page = match u32::try_from(page) {
        Ok(page) => Some(page),
        Err(_) => {
            violations.push(FieldViolation::new("page", "must be greater than or equal to 0"));
            None
        }
    };

    let size = if (1..=i64::from(limits.max_size)).contains(&size) {
        u32::try_from(size).ok()
    } else {
        violations.push(FieldViolation::new(
            "size",
            format!("must be between 1 and {}", limits.max_size),
        ));
        None
    };

    PageRequest::new(page?, size?)
}

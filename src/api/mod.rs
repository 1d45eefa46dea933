pub mod attendance;
pub mod dashboard;
pub mod employee;

use std::str::FromStr;

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::service::PageRequest;

/// Missing page → 1; missing limit → configured default; both clamped the
/// same way for every listing.
fn page_request(page: Option<u64>, limit: Option<u64>, config: &Config) -> ServiceResult<PageRequest> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size);
    PageRequest::new(page, limit)
}

/// Parses an optional query parameter. Blank means absent.
fn optional_param<T: FromStr>(name: &str, raw: Option<&str>) -> ServiceResult<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::Validation(format!("Invalid {}: '{}'", name, value))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;

    #[test]
    fn page_defaults_and_clamps() {
        let config = Config::from_lookup(|_| None).unwrap();

        let request = page_request(None, None, &config).unwrap();
        assert_eq!((request.page(), request.limit()), (1, 10));

        let request = page_request(Some(0), Some(5_000), &config).unwrap();
        assert_eq!((request.page(), request.limit()), (1, 100));

        let request = page_request(Some(4), Some(0), &config).unwrap();
        assert_eq!((request.page(), request.limit()), (4, 1));
    }

    #[test]
    fn optional_params_treat_blank_as_absent() {
        assert_eq!(optional_param::<EmployeeStatus>("status", Some("")).unwrap(), None);
        assert_eq!(
            optional_param::<EmployeeStatus>("status", Some("On Leave")).unwrap(),
            Some(EmployeeStatus::OnLeave)
        );
        assert!(matches!(
            optional_param::<EmployeeStatus>("status", Some("Retired")),
            Err(ServiceError::Validation(_))
        ));
    }
}

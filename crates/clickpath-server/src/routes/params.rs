//! Query-string parsing shared by the analytics routes.

use serde::Deserialize;

use clickpath_core::metrics::GroupBy;
use clickpath_core::SessionFilter;

use crate::error::AppError;

/// `sources` / `devices` query parameters, each a comma-separated list.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub sources: Option<String>,
    pub devices: Option<String>,
}

impl FilterParams {
    /// Build the session filter. A parameter that is present but lists no
    /// values (`?sources=`) is rejected instead of being read as "all".
    pub fn to_filter(&self) -> Result<SessionFilter, AppError> {
        session_filter(self.sources.as_deref(), self.devices.as_deref())
    }
}

pub fn session_filter(
    sources: Option<&str>,
    devices: Option<&str>,
) -> Result<SessionFilter, AppError> {
    Ok(SessionFilter::new(
        sources.map(split_list),
        devices.map(split_list),
    )?)
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_group_by(raw: Option<&str>) -> Result<Option<GroupBy>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("source") => Ok(Some(GroupBy::Source)),
        Some("device") => Ok(Some(GroupBy::Device)),
        Some("source_device") => Ok(Some(GroupBy::SourceDevice)),
        Some(_) => Err(AppError::BadRequest(
            "group_by must be one of: source, device, source_device".to_string(),
        )),
    }
}

pub fn group_by_name(group_by: GroupBy) -> &'static str {
    match group_by {
        GroupBy::Source => "source",
        GroupBy::Device => "device",
        GroupBy::SourceDevice => "source_device",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" direct, ,search,"), ["direct", "search"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn absent_params_mean_no_filter() {
        let filter = FilterParams::default().to_filter().expect("filter");
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn empty_sources_param_is_rejected() {
        let params = FilterParams {
            sources: Some(" , ".to_string()),
            devices: None,
        };
        assert!(matches!(params.to_filter(), Err(AppError::Core(_))));
    }

    #[test]
    fn group_by_values() {
        assert_eq!(parse_group_by(None).expect("none"), None);
        assert_eq!(
            parse_group_by(Some("source_device")).expect("pair"),
            Some(GroupBy::SourceDevice)
        );
        assert!(parse_group_by(Some("browser")).is_err());
    }
}

use crate::adjacency::DEFAULT_TARGET_EVENT;
use crate::metrics::DEFAULT_SUCCESS_EVENT;
use crate::ranking::DEFAULT_TOP_K;

/// Channel groups reported side by side, as `name=source,source;...`.
pub const DEFAULT_SEGMENTS: &str = "campaigns=linkedin_advert,partner_advert,facebook_advert;\
social=linkedin_share,facebook_share;\
organic=direct,search";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: String,
    /// Whether the data file starts with a header line.
    pub csv_has_headers: bool,
    pub cors_origins: Vec<String>,
    pub analysis: AnalysisConfig,
    pub segments: Vec<Segment>,
}

/// Identifiers and limits the reports are computed with.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub success_event: String,
    pub target_event: String,
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            success_event: DEFAULT_SUCCESS_EVENT.to_string(),
            target_event: DEFAULT_TARGET_EVENT.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A named set of acquisition sources, e.g. all paid campaigns.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub sources: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("CLICKPATH_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_path: std::env::var("CLICKPATH_DATA_PATH")
                .unwrap_or_else(|_| "./data/clickstream_data.csv".to_string()),
            csv_has_headers: std::env::var("CLICKPATH_CSV_HEADERS")
                .map(|v| v == "true")
                .unwrap_or(false),
            cors_origins: std::env::var("CLICKPATH_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            analysis: AnalysisConfig {
                success_event: non_empty_var("CLICKPATH_SUCCESS_EVENT", DEFAULT_SUCCESS_EVENT)?,
                target_event: non_empty_var("CLICKPATH_TARGET_EVENT", DEFAULT_TARGET_EVENT)?,
                top_k: match std::env::var("CLICKPATH_TOP_K") {
                    Ok(raw) => match raw.trim().parse::<usize>() {
                        Ok(k) if k > 0 => k,
                        _ => return Err(format!("invalid top_k: {raw}")),
                    },
                    Err(_) => DEFAULT_TOP_K,
                },
            },
            segments: parse_segments(
                &std::env::var("CLICKPATH_SEGMENTS")
                    .unwrap_or_else(|_| DEFAULT_SEGMENTS.to_string()),
            )?,
        })
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }
}

fn non_empty_var(key: &str, default: &str) -> Result<String, String> {
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Err(format!("{key} must not be empty")),
        Ok(raw) => Ok(raw.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

/// Parse `name=a,b;other=c`. Empty entries between separators are skipped;
/// a segment without sources is an error.
pub fn parse_segments(raw: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, sources) = entry
            .split_once('=')
            .ok_or_else(|| format!("invalid segment `{entry}`: expected name=source,..."))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("invalid segment `{entry}`: missing name"));
        }
        let sources: Vec<String> = sources
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if sources.is_empty() {
            return Err(format!("segment `{name}` lists no sources"));
        }
        if segments.iter().any(|s: &Segment| s.name == name) {
            return Err(format!("duplicate segment `{name}`"));
        }
        segments.push(Segment {
            name: name.to_string(),
            sources,
        });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_segments_parse() {
        let segments = parse_segments(DEFAULT_SEGMENTS).expect("defaults");
        let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["campaigns", "social", "organic"]);
        assert_eq!(segments[2].sources, ["direct", "search"]);
    }

    #[test]
    fn segments_tolerate_whitespace_and_trailing_separator() {
        let segments = parse_segments(" paid = a , b ; ").expect("parse");
        assert_eq!(
            segments,
            vec![Segment {
                name: "paid".to_string(),
                sources: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn invalid_segments_are_rejected() {
        assert!(parse_segments("paid").is_err());
        assert!(parse_segments("=a,b").is_err());
        assert!(parse_segments("paid=").is_err());
        assert!(parse_segments("paid=a;paid=b").is_err());
    }

    #[test]
    fn analysis_defaults() {
        let analysis = AnalysisConfig::default();
        assert_eq!(analysis.success_event, "purchase_success");
        assert_eq!(analysis.target_event, "purchase_start");
        assert_eq!(analysis.top_k, 10);
    }
}

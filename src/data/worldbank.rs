//! World Bank Indicators API (v2) integration.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::ObservationSource;
use crate::domain::{AnalysisConfig, Indicator, RawObservation};
use crate::error::AppError;

const PER_PAGE: usize = 1000;

/// One decoded response page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page: u64,
    pub pages: u64,
    pub total: u64,
    pub rows: Vec<RawObservation>,
}

pub struct WorldBankClient {
    client: Client,
    api_base: String,
}

impl WorldBankClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch every page of one indicator for the given countries and years.
    pub fn fetch_indicator(
        &self,
        indicator: Indicator,
        countries: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<RawObservation>, AppError> {
        let url = indicator_url(&self.api_base, countries, indicator);
        let date = format!("{start_year}:{end_year}");

        let mut out = Vec::new();
        let mut page_no: u64 = 1;
        loop {
            debug!(indicator = indicator.code(), page = page_no, "requesting page");
            let per_page = PER_PAGE.to_string();
            let page_param = page_no.to_string();
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("format", "json"),
                    ("date", date.as_str()),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .map_err(|e| AppError::data(format!("World Bank request failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AppError::data(format!(
                    "World Bank request for {} failed with status {}.",
                    indicator.code(),
                    resp.status()
                )));
            }

            let body = resp
                .text()
                .map_err(|e| AppError::data(format!("Failed to read World Bank response: {e}")))?;
            let page = parse_page(&body, indicator)?;
            out.extend(page.rows);

            if page.page >= page.pages {
                break;
            }
            page_no = page.page + 1;
        }

        info!(indicator = indicator.code(), rows = out.len(), "fetched indicator");
        Ok(out)
    }
}

impl ObservationSource for WorldBankClient {
    fn fetch(&self, config: &AnalysisConfig) -> Result<Vec<RawObservation>, AppError> {
        let mut all = Vec::new();
        for indicator in Indicator::ALL {
            let rows = self.fetch_indicator(indicator, &config.countries, config.start_year, config.end_year)?;
            all.extend(rows);
        }
        Ok(all)
    }
}

/// `{base}/country/US;DE/indicator/FP.CPI.TOTL.ZG`
pub fn indicator_url(base: &str, countries: &[String], indicator: Indicator) -> String {
    format!(
        "{}/country/{}/indicator/{}",
        base.trim_end_matches('/'),
        countries.join(";"),
        indicator.code()
    )
}

#[derive(Debug, Deserialize)]
struct ApiRow {
    country: ApiRef,
    #[serde(default)]
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    id: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    id: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}

/// Decode one JSON page.
///
/// Success bodies are `[meta, rows]` where `rows` may be `null` when nothing
/// matched. Error bodies are `[{"message": [...]}]`.
pub fn parse_page(body: &str, indicator: Indicator) -> Result<Page, AppError> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| AppError::data(format!("Failed to parse World Bank response: {e}")))?;

    let parts = doc
        .as_array()
        .ok_or_else(|| AppError::data("Unexpected World Bank response: expected a JSON array."))?;

    let meta = parts
        .first()
        .ok_or_else(|| AppError::data("Unexpected World Bank response: empty array."))?;

    if let Some(messages) = meta.get("message") {
        let messages: Vec<ApiMessage> = serde_json::from_value(messages.clone()).unwrap_or_default();
        let text = messages
            .iter()
            .map(|m| format!("{} {}: {}", m.id, m.key, m.value).trim().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AppError::data(format!(
            "World Bank API error for {}: {text}",
            indicator.code()
        )));
    }

    let page = meta_u64(meta, "page").unwrap_or(1);
    let pages = meta_u64(meta, "pages").unwrap_or(page);
    let total = meta_u64(meta, "total").unwrap_or(0);

    let rows = match parts.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(rows) => serde_json::from_value::<Vec<ApiRow>>(rows.clone())
            .map_err(|e| AppError::data(format!("Invalid World Bank row: {e}")))?,
    };

    let rows = rows
        .into_iter()
        .map(|r| RawObservation {
            country: r.country.value,
            country_code: r.country.id,
            period: r.date,
            indicator,
            value: r.value.filter(|v| v.is_finite()),
        })
        .collect();

    Ok(Page {
        page,
        pages,
        total,
        rows,
    })
}

/// Paging fields are numbers in current responses but strings in some older ones.
fn meta_u64(meta: &Value, key: &str) -> Option<u64> {
    match meta.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"[
        {"page":1,"pages":2,"per_page":1000,"total":3,"sourceid":"2","lastupdated":"2025-07-01"},
        [
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"US","value":"United States"},"countryiso3code":"USA",
             "date":"2001","value":2.83,"unit":"","obs_status":"","decimal":1},
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"US","value":"United States"},"countryiso3code":"USA",
             "date":"2000","value":3.38,"unit":"","obs_status":"","decimal":1},
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"DE","value":"Germany"},"countryiso3code":"DEU",
             "date":"2000","value":null,"unit":"","obs_status":"","decimal":1}
        ]
    ]"#;

    #[test]
    fn parses_rows_and_nulls() {
        let page = parse_page(PAGE, Indicator::Inflation).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.rows.len(), 3);

        let first = &page.rows[0];
        assert_eq!(first.country, "United States");
        assert_eq!(first.country_code, "US");
        assert_eq!(first.period, "2001");
        assert_eq!(first.indicator, Indicator::Inflation);
        assert_eq!(first.value, Some(2.83));

        assert_eq!(page.rows[2].value, None);
    }

    #[test]
    fn null_rows_mean_empty_page() {
        let body = r#"[{"page":0,"pages":0,"per_page":"1000","total":0}, null]"#;
        let page = parse_page(body, Indicator::Gdp).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn error_body_is_reported() {
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        let err = parse_page(body, Indicator::Unemployment).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("SL.UEM.TOTL.ZS"));
        assert!(err.message().contains("Invalid value"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_page("<html>", Indicator::Gdp).is_err());
        assert!(parse_page("{}", Indicator::Gdp).is_err());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = WorldBankClient::new("http://localhost:8080/v2/");
        assert_eq!(client.api_base(), "http://localhost:8080/v2");
    }

    #[test]
    fn url_joins_countries() {
        let countries = vec!["US".to_string(), "DE".to_string()];
        assert_eq!(
            indicator_url("https://api.worldbank.org/v2/", &countries, Indicator::Gdp),
            "https://api.worldbank.org/v2/country/US;DE/indicator/NY.GDP.MKTP.CD"
        );
    }

    fn inflation_body(page: u64, pages: u64, period: &str, value: f64) -> String {
        format!(
            r#"[{{"page":{page},"pages":{pages},"per_page":1,"total":{pages}}},
               [{{"indicator":{{"id":"FP.CPI.TOTL.ZG","value":"Inflation"}},
                  "country":{{"id":"US","value":"United States"}},
                  "date":"{period}","value":{value}}}]]"#
        )
    }

    #[test]
    fn fetch_follows_pages_in_order() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            for (page, period, value) in [(1, "2001", 1.0), (2, "2000", 2.0)] {
                Mock::given(method("GET"))
                    .and(path("/country/US/indicator/FP.CPI.TOTL.ZG"))
                    .and(query_param("page", page.to_string()))
                    .respond_with(ResponseTemplate::new(200).set_body_string(inflation_body(page, 2, period, value)))
                    .expect(1)
                    .mount(&server)
                    .await;
            }
            server
        });

        let client = WorldBankClient::new(server.uri());
        let rows = client
            .fetch_indicator(Indicator::Inflation, &["US".to_string()], 2000, 2001)
            .unwrap();
        let periods: Vec<&str> = rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2001", "2000"]);
        assert_eq!(rows[1].value, Some(2.0));

        let requests = rt.block_on(server.received_requests()).unwrap();
        let pages: Vec<String> = requests
            .iter()
            .filter_map(|r| r.url.query_pairs().find(|(k, _)| k == "page").map(|(_, v)| v.into_owned()))
            .collect();
        assert_eq!(pages, vec!["1", "2"]);
        let query = requests[0].url.query().unwrap_or_default();
        assert!(query.contains("format=json"));
        assert!(query.contains("date=2000%3A2001") || query.contains("date=2000:2001"));
        assert!(query.contains("per_page=1000"));
    }

    #[test]
    fn server_error_is_a_data_error_without_retry() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(500))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let client = WorldBankClient::new(server.uri());
        let err = client
            .fetch_indicator(Indicator::Gdp, &["US".to_string()], 2000, 2024)
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("500"));

        let requests = rt.block_on(server.received_requests()).unwrap();
        assert_eq!(requests.len(), 1);
    }
}

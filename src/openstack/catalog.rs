//! Keystone service catalog lookup and endpoint URL handling.

use serde::Deserialize;
use url::Url;

use crate::openstack::error::CloudError;

/// One service in the token's catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub interface: String,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub url: String,
}

impl Endpoint {
    fn in_region(&self, region: &str) -> bool {
        self.region_id.as_deref() == Some(region) || self.region.as_deref() == Some(region)
    }
}

/// First endpoint of `service_type` with a matching interface and region.
///
/// With no region configured, any region matches.
pub fn find_endpoint<'a>(
    catalog: &'a [CatalogEntry],
    service_type: &str,
    interface: &str,
    region: Option<&str>,
) -> Option<&'a str> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|ep| ep.interface == interface && region.map_or(true, |r| ep.in_region(r)))
        .map(|ep| ep.url.as_str())
}

/// Ensure the URL path ends in the given API version segment.
pub fn with_version(mut url: Url, version: &str) -> Url {
    let versioned = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .is_some_and(|last| last == version);

    if !versioned {
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(version);
        }
    }
    url
}

/// Append path segments to an endpoint URL, percent-encoding each one.
pub fn join_segments(base: &Url, extra: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(extra);
    }
    url
}

/// URL of one resource in a collection, e.g. `{compute}/servers/{id}`.
///
/// `.` and `..` are removed by URL path normalisation and would address the
/// collection itself, so they never name a resource.
pub fn resource_url(base: &Url, collection: &str, id: &str) -> Result<Url, CloudError> {
    if id == "." || id == ".." {
        return Err(CloudError::NotFound {
            url: format!("{}/{collection}/{id}", base.as_str().trim_end_matches('/')),
        });
    }
    Ok(join_segments(base, &[collection, id]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        serde_json::from_str(
            r#"[
                {"type": "compute", "endpoints": [
                    {"interface": "internal", "region_id": "RegionOne", "url": "http://nova-int:8774/v2.1"},
                    {"interface": "public", "region_id": "RegionTwo", "url": "https://nova-two:8774/v2.1"},
                    {"interface": "public", "region_id": "RegionOne", "url": "https://nova:8774/v2.1"}
                ]},
                {"type": "identity", "endpoints": [
                    {"interface": "public", "region": "RegionOne", "url": "https://keystone:5000"}
                ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_endpoint_by_interface_and_region() {
        let catalog = catalog();
        assert_eq!(
            find_endpoint(&catalog, "compute", "public", Some("RegionOne")),
            Some("https://nova:8774/v2.1")
        );
        assert_eq!(
            find_endpoint(&catalog, "compute", "internal", None),
            Some("http://nova-int:8774/v2.1")
        );
        assert_eq!(
            find_endpoint(&catalog, "identity", "public", Some("RegionOne")),
            Some("https://keystone:5000")
        );
    }

    #[test]
    fn test_find_endpoint_missing() {
        let catalog = catalog();
        assert_eq!(find_endpoint(&catalog, "compute", "admin", None), None);
        assert_eq!(find_endpoint(&catalog, "image", "public", None), None);
        assert_eq!(
            find_endpoint(&catalog, "compute", "public", Some("RegionThree")),
            None
        );
    }

    #[test]
    fn test_with_version() {
        let url = Url::parse("https://keystone:5000").unwrap();
        assert_eq!(with_version(url, "v3").as_str(), "https://keystone:5000/v3");

        let url = Url::parse("https://keystone:5000/v3/").unwrap();
        assert_eq!(with_version(url, "v3").as_str(), "https://keystone:5000/v3/");

        let url = Url::parse("https://cloud/identity").unwrap();
        assert_eq!(with_version(url, "v3").as_str(), "https://cloud/identity/v3");
    }

    #[test]
    fn test_join_segments() {
        let base = Url::parse("https://nova:8774/v2.1/project").unwrap();
        assert_eq!(
            join_segments(&base, &["servers", "abc"]).as_str(),
            "https://nova:8774/v2.1/project/servers/abc"
        );

        let base = Url::parse("https://keystone:5000/v3/").unwrap();
        assert_eq!(
            join_segments(&base, &["users", "a/b"]).as_str(),
            "https://keystone:5000/v3/users/a%2Fb"
        );
    }

    #[test]
    fn test_resource_url_rejects_dot_segments() {
        let nova = Url::parse("https://nova:8774/v2.1").unwrap();
        assert_eq!(
            resource_url(&nova, "servers", "abc").unwrap().as_str(),
            "https://nova:8774/v2.1/servers/abc"
        );

        for id in [".", ".."] {
            let err = resource_url(&nova, "servers", id).unwrap_err();
            assert!(matches!(err, CloudError::NotFound { .. }), "{err}");
        }

        let keystone = Url::parse("https://keystone:5000/v3/").unwrap();
        let err = resource_url(&keystone, "users", "..").unwrap_err();
        assert_eq!(
            err.to_string(),
            "resource not found: https://keystone:5000/v3/users/.."
        );
        assert_eq!(
            resource_url(&keystone, "users", "...").unwrap().as_str(),
            "https://keystone:5000/v3/users/..."
        );
    }
}

//! Template view models and the formatting shared by pages

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Environment;
use crate::domain::{display_name, parent_prefix, BucketSummary, ObjectListing};

/// Host-wide values every page shows in its layout
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub environment: &'static str,
    pub development: bool,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl SiteView {
    pub fn new(
        title: impl Into<String>,
        environment: Environment,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            environment: environment.as_str(),
            development: environment.is_development(),
            region,
            endpoint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView<'a> {
    pub site: &'a SiteView,
    pub title: &'static str,
    pub provider: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BucketsView<'a> {
    pub site: &'a SiteView,
    pub title: &'static str,
    pub buckets: Vec<BucketRow>,
}

#[derive(Debug, Serialize)]
pub struct BucketRow {
    pub name: String,
    pub href: String,
    pub created: String,
}

impl BucketsView<'_> {
    pub fn new(site: &SiteView, buckets: Vec<BucketSummary>) -> BucketsView<'_> {
        BucketsView {
            site,
            title: "Buckets",
            buckets: buckets
                .into_iter()
                .map(|bucket| BucketRow {
                    href: browse_href(&bucket.name, ""),
                    created: format_timestamp(bucket.created_at),
                    name: bucket.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BucketView<'a> {
    pub site: &'a SiteView,
    pub title: String,
    pub bucket: String,
    pub prefix: String,
    pub breadcrumbs: Vec<Crumb>,
    pub parent_href: Option<String>,
    pub folders: Vec<FolderRow>,
    pub objects: Vec<ObjectRow>,
    pub empty: bool,
    pub next_href: Option<String>,
    pub next_api_href: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct FolderRow {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct ObjectRow {
    pub name: String,
    pub key: String,
    pub size: String,
    pub modified: String,
    pub download_href: String,
}

impl BucketView<'_> {
    pub fn new(site: &SiteView, listing: ObjectListing) -> BucketView<'_> {
        let bucket = listing.bucket;
        let prefix = listing.prefix;

        let parent_href = if prefix.is_empty() {
            None
        } else {
            Some(browse_href(&bucket, &parent_prefix(&prefix)))
        };

        let next_href = listing.next_token.as_deref().map(|token| {
            format!(
                "{}&token={}",
                browse_href_with_query(&bucket, &prefix),
                urlencoding::encode(token)
            )
        });
        let next_api_href = listing.next_token.as_deref().map(|token| {
            format!(
                "/api/buckets/{}/objects?prefix={}&token={}",
                urlencoding::encode(&bucket),
                urlencoding::encode(&prefix),
                urlencoding::encode(token)
            )
        });

        let folders: Vec<FolderRow> = listing
            .folders
            .into_iter()
            .map(|folder| FolderRow {
                href: browse_href(&bucket, &folder.prefix),
                name: folder.name,
            })
            .collect();

        let objects: Vec<ObjectRow> = listing
            .objects
            .into_iter()
            .map(|object| ObjectRow {
                download_href: download_href(&bucket, &object.key),
                size: format_size(object.size),
                modified: format_timestamp(object.last_modified),
                name: object.name,
                key: object.key,
            })
            .collect();

        BucketView {
            site,
            title: bucket.clone(),
            breadcrumbs: breadcrumbs(&bucket, &prefix),
            empty: folders.is_empty() && objects.is_empty(),
            parent_href,
            folders,
            objects,
            next_href,
            next_api_href,
            bucket,
            prefix,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorView<'a> {
    pub site: &'a SiteView,
    pub title: &'static str,
    pub status: u16,
    pub message: String,
    pub detail: Option<String>,
}

/// Link to a bucket folder; the root prefix yields a query-free URL
pub fn browse_href(bucket: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        format!("/buckets/{}", urlencoding::encode(bucket))
    } else {
        browse_href_with_query(bucket, prefix)
    }
}

fn browse_href_with_query(bucket: &str, prefix: &str) -> String {
    format!(
        "/buckets/{}?prefix={}",
        urlencoding::encode(bucket),
        urlencoding::encode(prefix)
    )
}

pub fn download_href(bucket: &str, key: &str) -> String {
    format!(
        "/buckets/{}/download?key={}",
        urlencoding::encode(bucket),
        urlencoding::encode(key)
    )
}

/// Bucket root followed by one crumb per folder in the prefix
pub fn breadcrumbs(bucket: &str, prefix: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        name: bucket.to_string(),
        href: browse_href(bucket, ""),
    }];

    // Segments keep their trailing slash so a leading `/` becomes its own crumb
    let mut current = String::new();
    for segment in prefix.split_inclusive('/') {
        current.push_str(segment);
        crumbs.push(Crumb {
            name: display_name(segment).to_string(),
            href: browse_href(bucket, &current),
        });
    }

    crumbs
}

/// Binary units, one decimal place above bytes
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FolderEntry, ListObjectsQuery, ObjectEntry};

    fn site() -> SiteView {
        SiteView::new("Console", Environment::Production, None, None)
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0);
        assert_eq!(format_timestamp(ts), "2023-11-14 22:13 UTC");
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn test_hrefs_are_encoded() {
        assert_eq!(browse_href("data", ""), "/buckets/data");
        assert_eq!(
            browse_href("data", "my docs/"),
            "/buckets/data?prefix=my%20docs%2F"
        );
        assert_eq!(
            download_href("data", "a&b.txt"),
            "/buckets/data/download?key=a%26b.txt"
        );
    }

    #[test]
    fn test_breadcrumbs() {
        let crumbs = breadcrumbs("data", "2024/q1/");

        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[0].name, "data");
        assert_eq!(crumbs[0].href, "/buckets/data");
        assert_eq!(crumbs[1].name, "2024");
        assert_eq!(crumbs[1].href, "/buckets/data?prefix=2024%2F");
        assert_eq!(crumbs[2].name, "q1");
        assert_eq!(crumbs[2].href, "/buckets/data?prefix=2024%2Fq1%2F");
    }

    #[test]
    fn test_breadcrumbs_with_leading_slash() {
        let crumbs = breadcrumbs("data", "/etc/");

        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[1].name, "/");
        assert_eq!(crumbs[1].href, "/buckets/data?prefix=%2F");
        assert_eq!(crumbs[2].name, "etc");
        assert_eq!(crumbs[2].href, "/buckets/data?prefix=%2Fetc%2F");
    }

    #[test]
    fn test_slash_folder_is_browsable() {
        let site = site();
        let listing = ObjectListing {
            bucket: "data".to_string(),
            prefix: String::new(),
            folders: vec![FolderEntry {
                prefix: "/".to_string(),
                name: display_name("/").to_string(),
            }],
            objects: vec![],
            next_token: None,
        };

        let view = BucketView::new(&site, listing);

        assert_eq!(view.folders[0].name, "/");
        assert_eq!(view.folders[0].href, "/buckets/data?prefix=%2F");
        assert_eq!(
            ListObjectsQuery::new("data").with_prefix("/").prefix,
            "/"
        );
    }

    #[test]
    fn test_bucket_view_from_listing() {
        let site = site();
        let listing = ObjectListing {
            bucket: "data".to_string(),
            prefix: "2024/".to_string(),
            folders: vec![FolderEntry {
                prefix: "2024/q1/".to_string(),
                name: "q1".to_string(),
            }],
            objects: vec![ObjectEntry {
                key: "2024/report.pdf".to_string(),
                name: "report.pdf".to_string(),
                size: 2048,
                last_modified: None,
                etag: None,
            }],
            next_token: Some("abc=".to_string()),
        };

        let view = BucketView::new(&site, listing);

        assert_eq!(view.parent_href.as_deref(), Some("/buckets/data"));
        assert_eq!(view.folders[0].href, "/buckets/data?prefix=2024%2Fq1%2F");
        assert_eq!(view.objects[0].size, "2.0 KiB");
        assert_eq!(
            view.objects[0].download_href,
            "/buckets/data/download?key=2024%2Freport.pdf"
        );
        assert_eq!(
            view.next_href.as_deref(),
            Some("/buckets/data?prefix=2024%2F&token=abc%3D")
        );
        assert_eq!(
            view.next_api_href.as_deref(),
            Some("/api/buckets/data/objects?prefix=2024%2F&token=abc%3D")
        );
        assert!(!view.empty);
    }

    #[test]
    fn test_bucket_view_root_has_no_parent() {
        let site = site();
        let listing = ObjectListing {
            bucket: "data".to_string(),
            prefix: String::new(),
            folders: vec![],
            objects: vec![],
            next_token: None,
        };

        let view = BucketView::new(&site, listing);

        assert!(view.parent_href.is_none());
        assert!(view.next_href.is_none());
        assert!(view.empty);
    }

    #[test]
    fn test_buckets_view_rows() {
        let site = site();
        let view = BucketsView::new(
            &site,
            vec![BucketSummary {
                name: "logs".to_string(),
                created_at: None,
            }],
        );

        assert_eq!(view.buckets[0].href, "/buckets/logs");
        assert_eq!(view.buckets[0].created, "-");
    }
}

use serde::Deserialize;

/// A cat as listed by the provider, before it gets a rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatEntry {
    pub id: String,
    pub title: String,
    pub image: String,
}

/// `GET /v3/content_types/{type}/entries` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct EntriesResponse {
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    pub uid: String,
    pub title: String,
    pub file: RawFile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFile {
    pub url: String,
}

impl From<RawEntry> for CatEntry {
    fn from(raw: RawEntry) -> Self {
        Self { id: raw.uid, title: raw.title, image: raw.file.url }
    }
}

impl EntriesResponse {
    pub(crate) fn into_entries(self) -> Vec<CatEntry> {
        self.entries.into_iter().map(CatEntry::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_map_uid_and_file_url() {
        let body = r#"{
            "entries": [
                { "uid": "blt1", "title": "Tom", "file": { "url": "https://img/1.jpg", "size": 10 }, "locale": "en-us" },
                { "uid": "blt2", "title": "Felix", "file": { "url": "https://img/2.jpg" } }
            ],
            "count": 2
        }"#;

        let entries = serde_json::from_str::<EntriesResponse>(body).unwrap().into_entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            CatEntry { id: "blt1".into(), title: "Tom".into(), image: "https://img/1.jpg".into() }
        );
        assert_eq!(entries[1].id, "blt2");
    }

    #[test]
    fn empty_entries_are_fine() {
        let entries = serde_json::from_str::<EntriesResponse>(r#"{"entries":[]}"#).unwrap();
        assert!(entries.into_entries().is_empty());
    }

    #[test]
    fn missing_file_is_rejected() {
        let res = serde_json::from_str::<EntriesResponse>(r#"{"entries":[{"uid":"a","title":"b"}]}"#);
        assert!(res.is_err());
    }
}

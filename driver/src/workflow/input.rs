use anyhow::Context;
use mapcore::{VisitFeed, VisitRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Visit files are either the backend envelope or a bare list of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum VisitFile {
    List(Vec<VisitRecord>),
    Envelope(VisitFeed),
}

impl From<VisitFile> for VisitFeed {
    fn from(file: VisitFile) -> Self {
        match file {
            VisitFile::List(visits) => VisitFeed::new(visits),
            VisitFile::Envelope(feed) => feed.normalized(),
        }
    }
}

/// Loads visits from JSON (`.json`) or YAML (anything else).
pub fn load_feed<P: AsRef<Path>>(path: P) -> anyhow::Result<VisitFeed> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading visits {}", path_ref.display()))?;
    let is_json = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file: VisitFile = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing visits {}", path_ref.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing visits {}", path_ref.display()))?
    };
    let feed = VisitFeed::from(file);
    log::info!("loaded {} visits from {}", feed.len(), path_ref.display());
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapcore::VisitId;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn loads_yaml_list() {
        let mut temp = Builder::new().suffix(".yaml").tempfile().unwrap();
        temp.write_all(
            b"- id: 1\n  name: Yeonnam Book Cafe\n  category: book cafe\n  lat: 37.5656\n  lon: 126.9254\n  color: '#E8740C'\n- id: 2\n  name: Vintage Record Cafe\n  lat: 37.5563\n  lon: 126.9240\n",
        )
        .unwrap();
        let feed = load_feed(temp.path()).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.total_count, 2);
        assert_eq!(feed.visits[1].id, VisitId::Number(2));
    }

    #[test]
    fn loads_json_envelope() {
        let mut temp = Builder::new().suffix(".json").tempfile().unwrap();
        temp.write_all(
            br#"{"visits": [{"id": "v1", "place_name": "Hidden Garden", "latitude": 37.5347, "longitude": 127.0023}], "total_count": 1}"#,
        )
        .unwrap();
        let feed = load_feed(temp.path()).unwrap();
        assert_eq!(feed.visits[0].id, VisitId::from("v1"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_feed("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}

use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use survey_topics::Dataset;

use crate::lnt::*;

/// Identifies the content of an input: a file changes identity when its size or
/// modification time changes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SourceKey {
    File {
        path: PathBuf,
        worksheet: Option<String>,
        len: Option<u64>,
        modified: Option<SystemTime>,
    },
    Example,
}

impl SourceKey {
    pub fn of(source: &InputSource) -> SourceKey {
        match source {
            InputSource::File {
                path, worksheet, ..
            } => {
                let meta = fs::metadata(path).ok();
                SourceKey::File {
                    path: path.clone(),
                    worksheet: worksheet.clone(),
                    len: meta.as_ref().map(|m| m.len()),
                    modified: meta.and_then(|m| m.modified().ok()),
                }
            }
            InputSource::Example => SourceKey::Example,
        }
    }
}

/// A table, along with the message to show the user about how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: InputSource,
    pub dataset: Dataset,
    pub notice: Option<String>,
}

/// Loads a source. Failures are not fatal: they produce an empty table and a notice.
pub fn load_dataset<F>(source: &InputSource, loader: F) -> LoadedDataset
where
    F: FnOnce(&InputSource) -> DashResult<Dataset>,
{
    match loader(source) {
        Ok(dataset) => {
            let notice = match source {
                InputSource::File {
                    path,
                    discovered: true,
                    ..
                } => Some(format!("Using the file found: {}", path.display())),
                InputSource::Example => {
                    Some("No Excel file found. Using the example data.".to_string())
                }
                _ => None,
            };
            LoadedDataset {
                source: source.clone(),
                dataset,
                notice,
            }
        }
        Err(e) => {
            warn!("load_dataset: failed to load {:?}: {:?}", source, e);
            LoadedDataset {
                source: source.clone(),
                dataset: Dataset::empty(),
                notice: Some(format!("Error loading the data: {}", e)),
            }
        }
    }
}

/// Holds the last loaded table. It is only reloaded when the identity of the
/// requested source changes.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(SourceKey, LoadedDataset)>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> DatasetCache {
        DatasetCache::default()
    }

    pub fn get_or_load(&mut self, source: &InputSource) -> &LoadedDataset {
        self.get_or_load_with(source, read_survey_data)
    }

    pub fn get_or_load_with<F>(&mut self, source: &InputSource, loader: F) -> &LoadedDataset
    where
        F: FnOnce(&InputSource) -> DashResult<Dataset>,
    {
        self.fetch_with(source, loader).0
    }

    /// Like [`DatasetCache::get_or_load`], and also tells whether the source was
    /// read by this call.
    pub fn fetch(&mut self, source: &InputSource) -> (&LoadedDataset, bool) {
        self.fetch_with(source, read_survey_data)
    }

    fn fetch_with<F>(&mut self, source: &InputSource, loader: F) -> (&LoadedDataset, bool)
    where
        F: FnOnce(&InputSource) -> DashResult<Dataset>,
    {
        let key = SourceKey::of(source);
        let stale = match &self.entry {
            Some((k, _)) => *k != key,
            None => true,
        };
        if stale {
            info!("DatasetCache: loading {:?}", key);
            self.entry = None;
        }
        let loads = &mut self.loads;
        let (_, loaded) = self.entry.get_or_insert_with(|| {
            *loads += 1;
            (key, load_dataset(source, loader))
        });
        (&*loaded, stale)
    }

    /// The table currently held, if any.
    pub fn current(&self) -> Option<&LoadedDataset> {
        self.entry.as_ref().map(|(_, l)| l)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times a source was actually read.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnt::io_common::tests::scratch_dir;
    use snafu::prelude::*;
    use survey_topics::Field;

    #[test]
    fn example_source_loaded_once() {
        let mut cache = DatasetCache::new();
        let loaded = cache.get_or_load(&InputSource::Example);
        assert_eq!(loaded.dataset.len(), 4);
        assert!(loaded.notice.is_some());
        cache.get_or_load(&InputSource::Example);
        assert_eq!(cache.loads(), 1);
        cache.invalidate();
        assert!(cache.current().is_none());
        cache.get_or_load(&InputSource::Example);
        assert_eq!(cache.loads(), 2);
    }

    #[test]
    fn fetch_tells_when_the_source_was_read() {
        let mut cache = DatasetCache::new();
        let (loaded, fresh) = cache.fetch(&InputSource::Example);
        assert!(fresh);
        assert_eq!(loaded.dataset.len(), 4);
        let (_, fresh) = cache.fetch(&InputSource::Example);
        assert!(!fresh);
        cache.invalidate();
        assert!(cache.fetch(&InputSource::Example).1);
    }

    #[test]
    fn reloads_when_the_file_changes() {
        let dir = scratch_dir("cache");
        let a = dir.join("a.csv");
        let b = dir.join("b.csv");
        fs::write(&a, "Departamento\nTI\n").unwrap();
        fs::write(&b, "Departamento\nTI\nRH\n").unwrap();
        let src_a = InputSource::file(&a.display().to_string());
        let src_b = InputSource::file(&b.display().to_string());

        let mut cache = DatasetCache::new();
        assert_eq!(cache.get_or_load(&src_a).dataset.len(), 1);
        assert_eq!(cache.get_or_load(&src_a).dataset.len(), 1);
        assert_eq!(cache.loads(), 1);
        assert_eq!(cache.get_or_load(&src_b).dataset.len(), 2);
        assert_eq!(cache.loads(), 2);

        // Same path, different content
        fs::write(&b, "Departamento\nTI\nRH\nTI\n").unwrap();
        let loaded = cache.get_or_load(&src_b);
        assert_eq!(loaded.dataset.len(), 3);
        assert_eq!(
            loaded.dataset.distinct_values(Field::Department),
            vec!["RH".to_string(), "TI".to_string()]
        );
        assert_eq!(cache.loads(), 3);
    }

    #[test]
    fn failed_load_gives_empty_table() {
        let dir = scratch_dir("cache-broken");
        let p = dir.join("broken.xlsx");
        fs::write(&p, "garbage").unwrap();
        let mut cache = DatasetCache::new();
        let loaded = cache.get_or_load(&InputSource::file(&p.display().to_string()));
        assert!(loaded.dataset.is_empty());
        for f in Field::ALL {
            assert!(!loaded.dataset.columns().is_resolved(f));
        }
        assert!(loaded
            .notice
            .as_ref()
            .unwrap()
            .starts_with("Error loading the data"));
    }

    #[test]
    fn custom_loader_is_used_once() {
        let mut cache = DatasetCache::new();
        let loaded = cache.get_or_load_with(&InputSource::Example, |_| Ok(Dataset::empty()));
        assert!(loaded.dataset.is_empty());
        let loaded = cache.get_or_load_with(&InputSource::Example, |_| {
            whatever!("should not be called")
        });
        assert!(loaded.notice.is_some());
        assert_eq!(cache.loads(), 1);
    }
}

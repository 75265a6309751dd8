//! Loading labeled corpora from line-delimited list files.
//!
//! Each list file names one document per line. Every named document is read
//! as raw text, normalized, and labeled with the class of the list it came
//! from. Any unreadable list or document aborts the load.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::analyzer::TextNormalizer;
use crate::corpus::document::{Corpus, Document, Label};
use crate::error::{LectioError, Result};

/// Read a list file: one path per line, surrounding whitespace trimmed,
/// blank lines skipped. Relative paths are returned as written.
pub fn read_list<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| with_path(e, "list", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

fn with_path(error: std::io::Error, what: &str, path: &Path) -> LectioError {
    LectioError::Io(std::io::Error::new(
        error.kind(),
        format!("cannot read {what} {}: {error}", path.display()),
    ))
}

/// Builds a [`Corpus`] from per-class list files.
#[derive(Debug)]
pub struct CorpusLoader<'a> {
    normalizer: &'a TextNormalizer,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        CorpusLoader { normalizer }
    }

    /// Read and normalize a single document.
    pub fn load_document<P: AsRef<Path>>(&self, path: P, label: Label) -> Result<Document> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| with_path(e, "document", path))?;
        let raw = String::from_utf8_lossy(&bytes);
        let text = self.normalizer.normalize(&raw)?;
        Ok(Document::labeled(text, label).with_path(path))
    }

    /// Append every document named in `list` to `corpus` with `label`.
    pub fn load_list_into<P: AsRef<Path>>(
        &self,
        corpus: &mut Corpus,
        list: P,
        label: Label,
    ) -> Result<usize> {
        let paths = read_list(list.as_ref())?;
        for path in &paths {
            corpus.push(self.load_document(path, label)?);
        }
        log::info!(
            "Loaded {} {label} documents from {}",
            paths.len(),
            list.as_ref().display()
        );
        Ok(paths.len())
    }

    /// Load the interesting list followed by the boring list.
    pub fn load<P, Q>(&self, interesting: P, boring: Q) -> Result<Corpus>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let mut corpus = Corpus::new();
        self.load_list_into(&mut corpus, interesting, Label::Interesting)?;
        self.load_list_into(&mut corpus, boring, Label::Boring)?;
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::analysis::morphology::FunctionWordAnalyzer;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_list_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let list = write(dir.path(), "list.txt", "a.html\n\n  b.html  \n\n");
        let paths = read_list(&list).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.html"), PathBuf::from("b.html")]);
    }

    #[test]
    fn test_load_labels_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let a = write(dir.path(), "a.html", "Новый стартап и инвесторы");
        let b = write(dir.path(), "b.html", "Скучная новость о погоде");
        let interesting = write(dir.path(), "interesting.txt", &format!("{}\n", a.display()));
        let boring = write(dir.path(), "boring.txt", &format!("{}\n", b.display()));

        let normalizer = TextNormalizer::new(Arc::new(FunctionWordAnalyzer::new())).unwrap();
        let corpus = CorpusLoader::new(&normalizer)
            .load(&interesting, &boring)
            .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents()[0].text(), "Новый стартап инвесторы");
        assert_eq!(corpus.documents()[0].label(), Some(Label::Interesting));
        assert_eq!(corpus.documents()[1].text(), "Скучная новость погоде");
        assert_eq!(corpus.documents()[1].path(), Some(b.as_path()));
    }

    #[test]
    fn test_missing_document_is_fatal() {
        let dir = TempDir::new().unwrap();
        let list = write(dir.path(), "list.txt", "/nonexistent/article.html\n");
        let normalizer = TextNormalizer::new(Arc::new(FunctionWordAnalyzer::new())).unwrap();
        let mut corpus = Corpus::new();

        let result =
            CorpusLoader::new(&normalizer).load_list_into(&mut corpus, &list, Label::Boring);
        assert!(matches!(result, Err(LectioError::Io(_))));
    }

    #[test]
    fn test_missing_list_is_fatal() {
        assert!(read_list("/nonexistent/interesting.txt").is_err());
    }
}

//! Loads the catalog and similarity artifacts from disk.
//!
//! Both artifacts are read once at startup. Any problem (missing file, bad
//! JSON, ragged matrix, size mismatch) surfaces as `DataUnavailable` and no
//! partially loaded data escapes.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, SimilarityMatrix},
};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Catalog artifact layouts accepted on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogArtifact {
    /// `[{"title": "...", "movie_id": 1}, ...]`
    Records(Vec<CatalogRecord>),
    /// `{"title": {"0": "...", ...}, "movie_id": {"0": 1, ...}}`
    Columns(CatalogColumns),
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    title: String,
    #[serde(default)]
    movie_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CatalogColumns {
    title: BTreeMap<String, String>,
    #[serde(default)]
    movie_id: BTreeMap<String, i64>,
}

impl CatalogArtifact {
    fn into_catalog(self) -> AppResult<Catalog> {
        match self {
            CatalogArtifact::Records(records) => Ok(Catalog::new(
                records.into_iter().map(|r| (r.title, r.movie_id)),
            )),
            CatalogArtifact::Columns(columns) => {
                // Row keys are stringified integers; order numerically, not lexically
                let mut rows = columns
                    .title
                    .into_iter()
                    .map(|(key, title)| match key.parse::<u64>() {
                        Ok(row) => Ok((row, key, title)),
                        Err(_) => Err(AppError::DataUnavailable(format!(
                            "invalid catalog row key '{}'",
                            key
                        ))),
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                rows.sort_by_key(|(row, _, _)| *row);

                let movie_ids = columns.movie_id;
                Ok(Catalog::new(rows.into_iter().map(|(_, key, title)| {
                    let movie_id = movie_ids.get(&key).copied();
                    (title, movie_id)
                })))
            }
        }
    }
}

/// Loads both artifacts and checks they describe the same movies
pub fn load(
    catalog_path: impl AsRef<Path>,
    similarity_path: impl AsRef<Path>,
) -> AppResult<(Catalog, SimilarityMatrix)> {
    let catalog = load_catalog(catalog_path)?;
    let similarity = load_similarity(similarity_path)?;
    check_shape(&catalog, &similarity)?;

    tracing::info!(movies = catalog.len(), "Artifacts loaded");

    Ok((catalog, similarity))
}

/// Fails unless the matrix has exactly one row per catalog entry
pub fn check_shape(catalog: &Catalog, similarity: &SimilarityMatrix) -> AppResult<()> {
    if catalog.len() != similarity.size() {
        return Err(AppError::DataUnavailable(format!(
            "catalog has {} movies but similarity matrix has {} rows",
            catalog.len(),
            similarity.size()
        )));
    }
    Ok(())
}

/// Reads the catalog artifact
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let bytes = read_artifact(path)?;

    let artifact: CatalogArtifact = serde_json::from_slice(&bytes).map_err(|e| {
        AppError::DataUnavailable(format!("malformed catalog {}: {}", path.display(), e))
    })?;
    let catalog = artifact.into_catalog()?;

    tracing::debug!(path = %path.display(), movies = catalog.len(), "Catalog loaded");

    Ok(catalog)
}

/// Reads the similarity artifact, decompressing it if it is gzip-encoded
pub fn load_similarity(path: impl AsRef<Path>) -> AppResult<SimilarityMatrix> {
    let path = path.as_ref();
    let bytes = read_artifact(path)?;

    let rows: Vec<Vec<f64>> = serde_json::from_slice(&bytes).map_err(|e| {
        AppError::DataUnavailable(format!("malformed similarity matrix {}: {}", path.display(), e))
    })?;
    let matrix = SimilarityMatrix::from_rows(rows).map_err(|e| {
        AppError::DataUnavailable(format!("invalid similarity matrix {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), rows = matrix.size(), "Similarity matrix loaded");

    Ok(matrix)
}

/// Writes a matrix as gzip-compressed JSON and returns the number of bytes written
pub fn write_similarity_compressed(
    matrix: &SimilarityMatrix,
    path: impl AsRef<Path>,
    level: u32,
) -> AppResult<u64> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| AppError::Internal(format!("cannot create {}: {}", path.display(), e)))?;

    let rows: Vec<&[f64]> = matrix.rows().collect();
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::new(level));
    serde_json::to_writer(&mut encoder, &rows)
        .map_err(|e| AppError::Internal(format!("cannot encode matrix: {}", e)))?;

    let mut writer = encoder
        .finish()
        .map_err(|e| AppError::Internal(format!("cannot finish {}: {}", path.display(), e)))?;
    writer
        .flush()
        .map_err(|e| AppError::Internal(format!("cannot flush {}: {}", path.display(), e)))?;

    let written = std::fs::metadata(path)
        .map_err(|e| AppError::Internal(format!("cannot stat {}: {}", path.display(), e)))?
        .len();

    Ok(written)
}

/// Reads a whole artifact, transparently un-gzipping it
fn read_artifact(path: &Path) -> AppResult<Vec<u8>> {
    let unavailable =
        |e: std::io::Error| AppError::DataUnavailable(format!("cannot read {}: {}", path.display(), e));

    let mut raw = Vec::new();
    BufReader::new(File::open(path).map_err(unavailable)?)
        .read_to_end(&mut raw)
        .map_err(unavailable)?;

    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut decoded)
        .map_err(unavailable)?;

    tracing::debug!(
        path = %path.display(),
        compressed = raw.len(),
        decompressed = decoded.len(),
        "Decompressed artifact"
    );

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_records_catalog() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "movies.json",
            r#"[{"title": "Avatar", "movie_id": 19995}, {"title": "Spectre"}]"#,
        );

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().movie_id, Some(19995));
        assert_eq!(catalog.get(1).unwrap().title, "Spectre");
        assert_eq!(catalog.get(1).unwrap().movie_id, None);
    }

    #[test]
    fn test_load_column_catalog_orders_numerically() {
        let dir = TempDir::new().unwrap();
        let titles: Vec<String> = (0..11).map(|i| format!("\"{}\": \"Movie {}\"", i, i)).collect();
        let contents = format!(
            r#"{{"title": {{{}}}, "movie_id": {{"10": 42}}}}"#,
            titles.join(", ")
        );
        let path = write(&dir, "movies.json", &contents);

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.get(2).unwrap().title, "Movie 2");
        assert_eq!(catalog.get(10).unwrap().title, "Movie 10");
        assert_eq!(catalog.get(10).unwrap().movie_id, Some(42));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = load_catalog(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn test_malformed_catalog_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "movies.json", r#"{"name": ["nope"]}"#);
        assert!(matches!(load_catalog(&path), Err(AppError::DataUnavailable(_))));
    }

    #[test]
    fn test_ragged_matrix_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "similarity.json", "[[1.0, 0.5], [0.5]]");
        assert!(matches!(load_similarity(&path), Err(AppError::DataUnavailable(_))));
    }

    #[test]
    fn test_compressed_matrix_matches_plain() {
        let dir = TempDir::new().unwrap();
        let plain_path = write(&dir, "similarity.json", "[[1.0, 0.25], [0.25, 1.0]]");
        let plain = load_similarity(&plain_path).unwrap();

        let packed_path = dir.path().join("similarity.bin");
        let written = write_similarity_compressed(&plain, &packed_path, 3).unwrap();
        assert!(written > 0);

        let mut header = [0u8; 2];
        File::open(&packed_path).unwrap().read_exact(&mut header).unwrap();
        assert_eq!(header, GZIP_MAGIC);

        assert_eq!(load_similarity(&packed_path).unwrap(), plain);
    }

    #[test]
    fn test_near_equal_scores_survive_loading() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "similarity.json",
            "[[1.0, 0.12345678912, 0.12345679], [0.12345678912, 1.0, 0.5], [0.12345679, 0.5, 1.0]]",
        );

        let matrix = load_similarity(&path).unwrap();
        assert_eq!(matrix.row(0), Some(&[1.0, 0.12345678912, 0.12345679][..]));

        let packed_path = dir.path().join("similarity.json.gz");
        write_similarity_compressed(&matrix, &packed_path, 3).unwrap();
        assert_eq!(load_similarity(&packed_path).unwrap(), matrix);
    }

    #[test]
    fn test_load_rejects_size_mismatch() {
        let dir = TempDir::new().unwrap();
        let catalog = write(&dir, "movies.json", r#"[{"title": "A"}, {"title": "B"}, {"title": "C"}]"#);
        let similarity = write(&dir, "similarity.json", "[[1.0, 0.5], [0.5, 1.0]]");

        let err = load(&catalog, &similarity).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(msg) if msg.contains("3 movies")));
    }
}

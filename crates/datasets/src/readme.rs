use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use bstr::{BStr, BString, ByteSlice};
use regex::bytes::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{DatasetError, DatasetResult};

const DELIMITER: &[u8] = b"---\n";

/// Matches an opening `---` line (after an optional byte order mark and
/// blank lines), the (shortest) header up to the first closing `---` or
/// `...` line and the remaining body.
fn frontmatter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?sm-u)\A(?:\xEF\xBB\xBF)?(?:[ \t]*\r?\n)*",
            r"---[ \t]*\r?\n(?P<header>.*?)",
            r"(?:^(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)(?P<body>.*))?\z",
        ))
        .expect("valid regex")
    })
}

/// The recognized keys of a README frontmatter block. Both are kept as
/// raw YAML values, so that a README with an unusual spelling (e.g.
/// `dataset: yes` or `description: 2024`) still counts.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Frontmatter {
    #[serde(default)]
    dataset: Value,

    #[serde(default)]
    description: Value,
}

impl Frontmatter {
    /// Returns true, if the `dataset` key marks the enclosing directory
    /// as a dataset. Besides boolean `true`, the YAML 1.1 spellings
    /// `yes`, `y` and `on` (any case) and non-zero numbers are accepted.
    pub(crate) fn is_dataset(&self) -> bool {
        match &self.dataset {
            Value::Bool(value) => *value,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => matches!(
                s.to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "on"
            ),
            _ => false,
        }
    }

    /// Returns the short one-liner description of the dataset. Scalars
    /// are rendered as they read, a missing key gives an empty string.
    pub(crate) fn description(&self) -> String {
        match &self.description {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            value => serde_yaml::to_string(value)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}

/// A README file split into its parsed frontmatter (header) and the
/// untouched free-form text that follows it (body).
#[derive(Debug, Clone)]
pub(crate) struct Readme {
    header: Mapping,
    body: BString,
}

impl Readme {
    /// Reads and splits the README at `path`.
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Splits `data` into the first frontmatter block and the body.
    ///
    /// A README that doesn't start with a `---` line or whose header
    /// isn't a YAML mapping is reported as an invalid dataset. Malformed
    /// YAML inside the block is a [DatasetError::Yaml].
    pub(crate) fn from_bytes<B: AsRef<[u8]>>(data: B) -> DatasetResult<Self> {
        let data = data.as_ref();
        let Some(captures) = frontmatter_regex().captures(data) else {
            return Err(DatasetError::invalid(
                "README does not start with a YAML frontmatter block",
            ));
        };

        let header = captures.name("header").map_or(&b""[..], |m| m.as_bytes());
        let body = captures.name("body").map_or(&b""[..], |m| m.as_bytes());

        let header = match serde_yaml::from_slice::<Value>(header)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(DatasetError::invalid(
                    "README frontmatter is not a YAML mapping",
                ));
            }
        };

        Ok(Self {
            header,
            body: BString::from(body),
        })
    }

    /// Returns the typed view of the header.
    pub(crate) fn frontmatter(&self) -> DatasetResult<Frontmatter> {
        serde_yaml::from_value(Value::Mapping(self.header.clone()))
            .map_err(|e| {
                DatasetError::invalid(format!("README frontmatter: {e}"))
            })
    }

    #[inline]
    pub(crate) fn header(&self) -> &Mapping {
        &self.header
    }

    #[inline]
    pub(crate) fn body(&self) -> &BStr {
        self.body.as_bstr()
    }

    /// Sets `key` in the header. An existing key keeps its position.
    pub(crate) fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        self.header.insert(key.into(), value.into());
    }

    /// Encodes the README: the header between `---` lines, followed
    /// by the body byte for byte.
    pub(crate) fn to_bytes(&self) -> DatasetResult<Vec<u8>> {
        let mut out = DELIMITER.to_vec();
        if !self.header().is_empty() {
            let header = serde_yaml::to_string(self.header())?;
            out.extend_from_slice(header.as_bytes());
        }

        out.extend_from_slice(DELIMITER);
        out.extend_from_slice(self.body());
        Ok(out)
    }

    /// Writes the encoded README to `path`.
    pub(crate) fn save<P: AsRef<Path>>(&self, path: P) -> DatasetResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn readme_from_bytes() -> TestResult {
        let readme = Readme::from_bytes(
            "---\ndataset: true\ndescription: Alpha set\n---\nmore text\n",
        )?;

        let frontmatter = readme.frontmatter()?;
        assert!(frontmatter.is_dataset());
        assert_eq!(frontmatter.description(), "Alpha set");
        assert_eq!(readme.body(), "more text\n");
        Ok(())
    }

    #[test]
    fn readme_body_keeps_later_delimiters() -> TestResult {
        let readme = Readme::from_bytes(
            "---\ndataset: true\n---\n# Notes\n---\nfoo: bar\n---\n",
        )?;

        assert_eq!(readme.header().len(), 1);
        assert_eq!(readme.body(), "# Notes\n---\nfoo: bar\n---\n");
        Ok(())
    }

    #[test]
    fn readme_body_non_utf8() -> TestResult {
        let mut data = b"---\ndataset: true\n---\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);

        let readme = Readme::from_bytes(&data)?;
        assert_eq!(readme.body().as_bytes(), &[0xff, 0xfe, b'\n']);
        Ok(())
    }

    #[test]
    fn readme_without_closing_delimiter() -> TestResult {
        let readme = Readme::from_bytes("---\ndataset: true\n")?;
        assert!(readme.frontmatter()?.is_dataset());
        assert!(readme.body().is_empty());
        Ok(())
    }

    #[test]
    fn readme_document_end_marker() -> TestResult {
        let readme =
            Readme::from_bytes("---\ndataset: true\n...\nbody\n")?;
        assert!(readme.frontmatter()?.is_dataset());
        assert_eq!(readme.body(), "body\n");
        Ok(())
    }

    #[test]
    fn readme_missing_frontmatter() {
        let result = Readme::from_bytes("# Alpha\n\nsome text\n");
        assert!(matches!(result, Err(DatasetError::InvalidDataset(_))));
    }

    #[test]
    fn readme_header_not_a_mapping() {
        let result = Readme::from_bytes("---\n- a\n- b\n---\n");
        assert!(matches!(result, Err(DatasetError::InvalidDataset(_))));
    }

    #[test]
    fn readme_empty_header() -> TestResult {
        let readme = Readme::from_bytes("---\n---\nbody")?;
        assert!(!readme.frontmatter()?.is_dataset());
        assert_eq!(readme.body(), "body");
        Ok(())
    }

    #[test]
    fn readme_malformed_yaml() {
        let result = Readme::from_bytes("---\ndataset: [true\n---\n");
        assert!(matches!(result, Err(DatasetError::Yaml(_))));
    }

    #[test]
    fn readme_dataset_spellings() -> TestResult {
        for (value, expected) in [
            ("true", true),
            ("yes", true),
            ("On", true),
            ("Y", true),
            ("1", true),
            ("'true'", true),
            ("false", false),
            ("no", false),
            ("0", false),
            ("maybe", false),
            ("", false),
            ("[true]", false),
        ] {
            let readme =
                Readme::from_bytes(format!("---\ndataset: {value}\n---\n"))?;
            assert_eq!(readme.frontmatter()?.is_dataset(), expected, "{value}");
        }

        Ok(())
    }

    #[test]
    fn readme_description_scalars() -> TestResult {
        for (value, expected) in [
            ("Alpha set", "Alpha set"),
            ("2024", "2024"),
            ("1.5", "1.5"),
            ("false", "false"),
            ("~", ""),
            ("'007'", "007"),
        ] {
            let readme = Readme::from_bytes(format!(
                "---\ndataset: true\ndescription: {value}\n---\n"
            ))?;
            assert_eq!(readme.frontmatter()?.description(), expected);
        }

        let readme = Readme::from_bytes("---\ndataset: true\n---\n")?;
        assert_eq!(readme.frontmatter()?.description(), "");
        Ok(())
    }

    #[test]
    fn readme_leading_bom_and_blank_lines() -> TestResult {
        let mut data = b"\xEF\xBB\xBF".to_vec();
        data.extend_from_slice(b"---\ndataset: true\n---\nbody\n");
        let readme = Readme::from_bytes(&data)?;
        assert!(readme.frontmatter()?.is_dataset());
        assert_eq!(readme.body(), "body\n");

        let readme =
            Readme::from_bytes("\n  \r\n---\ndataset: true\n---\nbody\n")?;
        assert!(readme.frontmatter()?.is_dataset());
        assert_eq!(readme.body(), "body\n");

        // text before the block is not a frontmatter
        let result = Readme::from_bytes("# Alpha\n---\ndataset: true\n---\n");
        assert!(matches!(result, Err(DatasetError::InvalidDataset(_))));
        Ok(())
    }

    #[test]
    fn readme_insert_and_encode() -> TestResult {
        let mut readme = Readme::from_bytes(
            "---\ndataset: true\ndescription: Alpha set\n---\nmore text",
        )?;

        readme.insert("source", "/data/alpha");
        readme.insert("description", "Beta set");

        let encoded = String::from_utf8(readme.to_bytes()?)?;
        assert_eq!(
            encoded,
            "---\ndataset: true\ndescription: Beta set\n\
                source: /data/alpha\n---\nmore text"
        );

        let decoded = Readme::from_bytes(encoded)?;
        assert_eq!(decoded.body(), "more text");
        assert_eq!(
            decoded.header().get("source"),
            Some(&Value::from("/data/alpha"))
        );
        Ok(())
    }
}

//! .apkg file generation.
//!
//! An `.apkg` is a ZIP archive holding a `collection.anki2` SQLite database,
//! a `media` manifest mapping entry numbers to file names, and one numbered
//! entry per media file.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::schema::{CardTemplate, DeckPackage, NoteType};
use crate::sql::{COLLECTION_CONF, DECK_CONF, FIELD_SEPARATOR, SCHEMA};

/// Writes a [`DeckPackage`] to an `.apkg` file.
pub struct ApkgBuilder {
    package: DeckPackage,
}

impl ApkgBuilder {
    /// Create a new builder for a package.
    pub fn new(package: DeckPackage) -> Self {
        Self { package }
    }

    /// The package being written.
    pub fn package(&self) -> &DeckPackage {
        &self.package
    }

    /// Build the .apkg file and write it to the specified path.
    ///
    /// Every media file is checked before the output file is created, so a
    /// missing file never leaves a half-written package behind.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        for media in &self.package.media {
            if !media.path.is_file() {
                return Err(Error::MediaNotFound(media.path.display().to_string()));
            }
        }

        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("collection.anki2");

        {
            let conn = Connection::open(&db_path)?;
            self.create_database(&conn)?;
        }

        let file = std::fs::File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("collection.anki2", options)?;
        zip.write_all(&std::fs::read(&db_path)?)?;

        zip.start_file("media", options)?;
        zip.write_all(self.build_media_manifest()?.as_bytes())?;

        for (index, media) in self.package.media.iter().enumerate() {
            let content = std::fs::read(&media.path)?;
            zip.start_file(index.to_string(), options)?;
            zip.write_all(&content)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn create_database(&self, conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;

        let now = current_timestamp();
        let now_ms = now * 1000;

        conn.execute(
            "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
             VALUES (1, ?, ?, ?, 11, 0, 0, 0, ?, ?, ?, ?, '{}')",
            rusqlite::params![
                now,
                now_ms,
                now_ms,
                COLLECTION_CONF,
                self.build_models_json(now)?,
                self.build_decks_json(now)?,
                DECK_CONF
            ],
        )?;

        let mut card_id = now_ms;
        for (position, note) in self.package.notes.iter().enumerate() {
            let note_type = self
                .package
                .note_type(note.note_type)
                .ok_or(Error::UnknownNoteType(note.note_type))?;

            let note_id = now_ms + position as i64;
            let sort_field = note
                .fields
                .get(note_type.sort_field_index())
                .cloned()
                .unwrap_or_default();

            conn.execute(
                "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
                 VALUES (?, ?, ?, ?, -1, ?, ?, ?, ?, 0, '')",
                rusqlite::params![
                    note_id,
                    generate_guid(note_id, self.package.deck_id),
                    note_type.id,
                    now,
                    note.tags_string(),
                    note.fields.join(FIELD_SEPARATOR),
                    strip_html(&sort_field),
                    compute_checksum(&sort_field)
                ],
            )?;

            for ord in 0..note_type.templates.len() {
                conn.execute(
                    "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data)
                     VALUES (?, ?, ?, ?, ?, -1, 0, 0, ?, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                    rusqlite::params![card_id, note_id, self.package.deck_id, ord as i64, now, position as i64 + 1],
                )?;
                card_id += 1;
            }
        }

        Ok(())
    }

    fn build_models_json(&self, now: i64) -> Result<String> {
        let models: HashMap<String, serde_json::Value> = self
            .package
            .note_types
            .iter()
            .map(|note_type| (note_type.id.to_string(), self.model_json(note_type, now)))
            .collect();

        Ok(serde_json::to_string(&models)?)
    }

    fn model_json(&self, note_type: &NoteType, now: i64) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = note_type
            .fields
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                serde_json::json!({
                    "name": name,
                    "ord": ord,
                    "sticky": false,
                    "rtl": false,
                    "font": "Arial",
                    "size": 20,
                    "media": []
                })
            })
            .collect();

        let templates: Vec<serde_json::Value> = note_type
            .templates
            .iter()
            .enumerate()
            .map(|(ord, template)| {
                serde_json::json!({
                    "name": template.name,
                    "ord": ord,
                    "qfmt": template.front,
                    "afmt": template.back,
                    "bqfmt": "",
                    "bafmt": "",
                    "did": null,
                    "bfont": "",
                    "bsize": 0
                })
            })
            .collect();

        serde_json::json!({
            "id": note_type.id,
            "name": note_type.name,
            "type": 0,
            "mod": now,
            "usn": -1,
            "sortf": note_type.sort_field_index(),
            "did": self.package.deck_id,
            "tmpls": templates,
            "flds": fields,
            "css": note_type.css,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "latexsvg": false,
            "tags": [],
            "vers": [],
            "req": build_requirements(&note_type.templates, &note_type.fields)
        })
    }

    fn build_decks_json(&self, now: i64) -> Result<String> {
        let mut decks: HashMap<String, serde_json::Value> = HashMap::new();
        decks.insert("1".to_string(), deck_json(1, "Default", now));
        decks.insert(
            self.package.deck_id.to_string(),
            deck_json(self.package.deck_id, &self.package.deck_name, now),
        );
        Ok(serde_json::to_string(&decks)?)
    }

    fn build_media_manifest(&self) -> Result<String> {
        let manifest: BTreeMap<String, &str> = self
            .package
            .media
            .iter()
            .enumerate()
            .map(|(index, media)| (index.to_string(), media.name.as_str()))
            .collect();

        Ok(serde_json::to_string(&manifest)?)
    }
}

fn deck_json(id: i64, name: &str, now: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "mod": now,
        "name": name,
        "usn": -1,
        "lrnToday": [0, 0],
        "revToday": [0, 0],
        "newToday": [0, 0],
        "timeToday": [0, 0],
        "collapsed": false,
        "browserCollapsed": false,
        "desc": "",
        "dyn": 0,
        "conf": 1,
        "extendNew": 10,
        "extendRev": 50
    })
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Base91 GUID in Anki's alphabet, salted with the deck id.
fn generate_guid(note_id: i64, deck_id: i64) -> String {
    const CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+,-./:;<=>?@[]^_`{|}~";
    let mut n = (note_id as u64) ^ ((deck_id as u64) << 20);
    let mut guid = String::new();
    while n > 0 {
        guid.push(CHARS[(n % 91) as usize] as char);
        n /= 91;
    }
    guid
}

fn compute_checksum(sort_field: &str) -> i64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    strip_html(sort_field).hash(&mut hasher);
    (hasher.finish() & 0xFFFF_FFFF) as i64
}

fn strip_html(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// For each template, the fields whose presence makes its front non-empty.
fn build_requirements(templates: &[CardTemplate], fields: &[String]) -> Vec<serde_json::Value> {
    templates
        .iter()
        .enumerate()
        .map(|(ord, template)| {
            let referenced: Vec<usize> = fields
                .iter()
                .enumerate()
                .filter(|(_, name)| template.front.contains(&format!("{{{{{}}}}}", name)))
                .map(|(i, _)| i)
                .collect();

            if referenced.is_empty() {
                serde_json::json!([ord, "any", [0]])
            } else {
                serde_json::json!([ord, "any", referenced])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FILL_IN_BLANK_ID, MediaFile, Note};
    use tempfile::tempdir;

    fn blank_package() -> DeckPackage {
        let mut package = DeckPackage::new(1_234_567_890, "Test");
        package.add_note_type(NoteType::fill_in_blank());
        package
            .add_note(Note::new(
                FILL_IN_BLANK_ID,
                vec![
                    "El _____ duerme".to_string(),
                    String::new(),
                    String::new(),
                    "gato".to_string(),
                ],
            ))
            .unwrap();
        package
    }

    #[test]
    fn test_generate_guid_is_deterministic() {
        let guid = generate_guid(1_700_000_000_000, 42);
        assert!(!guid.is_empty());
        assert_eq!(guid, generate_guid(1_700_000_000_000, 42));
        assert_ne!(guid, generate_guid(1_700_000_000_001, 42));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<img src='a.jpg'>gato"), "gato");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_requirements_follow_front_fields() {
        let vocab = NoteType::vocab();
        let req = build_requirements(&vocab.templates, &vocab.fields);
        // Word recall asks with Image and Additional hint.
        assert_eq!(req[1], serde_json::json!([1, "any", [3, 5]]));
    }

    #[test]
    fn test_write_apkg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.apkg");

        ApkgBuilder::new(blank_package()).write_to_file(&path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert!(names.contains(&"collection.anki2"));
        assert!(names.contains(&"media"));
    }

    #[test]
    fn test_missing_media_fails_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.apkg");

        let mut package = blank_package();
        package.add_media(MediaFile {
            name: "gone.jpg".to_string(),
            path: dir.path().join("gone.jpg"),
        });

        let err = ApkgBuilder::new(package).write_to_file(&path).unwrap_err();
        assert!(matches!(err, Error::MediaNotFound(_)));
        assert!(!path.exists());
    }
}

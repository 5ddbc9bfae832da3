use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rustybuzz::{Direction, UnicodeBuffer};
use ttf_parser::Face;

use crate::measure::FontMetrics;

/// Loaded font faces, indexed by `(lowercase family, bold, italic)`.
///
/// Widths are produced by shaping the whole string, not by summing
/// per-character advances; Arabic joining forms make the naive sum wrong.
pub struct FontLibrary {
    faces: Vec<LoadedFace>,
    lookup: HashMap<(String, bool, bool), usize>,
}

struct LoadedFace {
    data: FaceData,
    face_index: u32,
    from_collection: bool,
}

enum FaceData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FaceData {
    fn bytes(&self) -> &[u8] {
        match self {
            FaceData::Mapped(map) => map,
            FaceData::Owned(vec) => vec,
        }
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    // ID 1 (Family) matches what settings reference and distinguishes
    // sibling families that ID 16 groups under one name.
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    // User-configured directories take precedence.
    if let Ok(val) = std::env::var("ADPRESS_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

impl FontLibrary {
    pub fn empty() -> Self {
        Self {
            faces: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Scan the user-configured and platform font directories.
    pub fn discover() -> Self {
        let t0 = std::time::Instant::now();
        let mut library = Self::empty();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut files_loaded = 0u32;

        let mut stack = font_directories();
        while let Some(dir) = stack.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if is_font_file(&path) && library.register_file(&path) {
                    files_loaded += 1;
                }
            }
        }

        log::info!(
            "Font scan: {:.1}ms, {} files loaded, {} face entries",
            t0.elapsed().as_secs_f64() * 1000.0,
            files_loaded,
            library.lookup.len(),
        );
        library
    }

    pub fn register_dir(&mut self, path: impl AsRef<Path>) {
        let Ok(entries) = std::fs::read_dir(path.as_ref()) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_font_file(&path) {
                self.register_file(&path);
            }
        }
    }

    /// Map and index one font file. Returns false when the file could not
    /// be opened or holds no parsable face.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let Ok(file) = std::fs::File::open(path) else {
            return false;
        };
        let Ok(data) = (unsafe { Mmap::map(&file) }) else {
            return false;
        };
        let collection = is_font_collection(path);
        let face_count = if collection {
            ttf_parser::fonts_in_collection(&data).unwrap_or(1)
        } else {
            1
        };

        let mut registered = false;
        for face_index in 0..face_count {
            let Ok(face) = Face::parse(&data, face_index) else {
                continue;
            };
            let Some(family) = font_family_name(&face) else {
                continue;
            };
            let key = (family.to_lowercase(), face.is_bold(), face.is_italic());
            if self.lookup.contains_key(&key) {
                continue;
            }
            // Each indexed face owns its own mapping of the file.
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            self.lookup.insert(key, self.faces.len());
            self.faces.push(LoadedFace {
                data: FaceData::Mapped(data),
                face_index,
                from_collection: collection,
            });
            registered = true;
        }
        registered
    }

    /// Index an in-memory font, e.g. one bundled with the application.
    pub fn register_bytes(&mut self, data: Vec<u8>) -> bool {
        let Ok(face) = Face::parse(&data, 0) else {
            return false;
        };
        let Some(family) = font_family_name(&face) else {
            return false;
        };
        let key = (family.to_lowercase(), face.is_bold(), face.is_italic());
        self.lookup.insert(key, self.faces.len());
        self.faces.push(LoadedFace {
            data: FaceData::Owned(data),
            face_index: 0,
            from_collection: false,
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// `(family, weight)` resolution: exact style first, then the family's
    /// other styles, then any loaded face at all, the same way a text
    /// surface substitutes a fallback font rather than rendering nothing.
    /// Returns `None` only for an empty library.
    fn resolve(&self, family: &str, weight: u16) -> Option<&LoadedFace> {
        let key = family.to_lowercase();
        let bold = weight >= 600;
        let candidates = [
            (key.clone(), bold, false),
            (key.clone(), bold, true),
            (key.clone(), false, false),
            (key, true, false),
        ];
        for candidate in &candidates {
            if let Some(&idx) = self.lookup.get(candidate) {
                return Some(&self.faces[idx]);
            }
        }
        self.faces.first()
    }

    /// Raw bytes + format hint for embedding the face in a document.
    /// Collection members are not embeddable as-is and return `None`.
    pub fn font_data(&self, family: &str, weight: u16) -> Option<(&[u8], &'static str)> {
        let loaded = self.resolve(family, weight)?;
        if loaded.from_collection {
            return None;
        }
        let bytes = loaded.data.bytes();
        let format = if bytes.len() >= 4 && &bytes[..4] == b"OTTO" {
            "opentype"
        } else {
            "truetype"
        };
        Some((bytes, format))
    }
}

impl FontMetrics for FontLibrary {
    fn measure(&self, text: &str, font_size: f32, family: &str, weight: u16) -> Option<f32> {
        let loaded = self.resolve(family, weight)?;
        measure_shaped(loaded.data.bytes(), loaded.face_index, text, font_size)
    }
}

impl FontMetrics for std::rc::Rc<FontLibrary> {
    fn measure(&self, text: &str, font_size: f32, family: &str, weight: u16) -> Option<f32> {
        self.as_ref().measure(text, font_size, family, weight)
    }
}

fn measure_shaped(data: &[u8], face_index: u32, text: &str, font_size: f32) -> Option<f32> {
    let face = rustybuzz::Face::from_slice(data, face_index)?;
    let units_per_em = face.units_per_em().max(1) as f32;

    let mut buffer = UnicodeBuffer::new();
    buffer.set_direction(detect_direction(text));
    buffer.push_str(text);
    let output = rustybuzz::shape(&face, &[], buffer);

    let mut total_units: i64 = 0;
    for pos in output.glyph_positions() {
        total_units += pos.x_advance as i64;
    }
    Some(total_units as f32 / units_per_em * font_size)
}

fn detect_direction(text: &str) -> Direction {
    for ch in text.chars() {
        let code = ch as u32;
        let rtl = matches!(
            code,
            0x0590..=0x08FF
                | 0xFB1D..=0xFDFF
                | 0xFE70..=0xFEFF
                | 0x1EE00..=0x1EEFF
        );
        if rtl {
            return Direction::RightToLeft;
        }
    }
    Direction::LeftToRight
}

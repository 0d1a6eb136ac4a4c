// src/app/prefs.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::{debug, warn};

use super::types::ImageCategory;

/// Where the picker keeps its window size and per-category scale.
pub trait PreferenceStore {
    fn window_size(&self) -> Option<(u32, u32)>;
    fn set_window_size(&mut self, size: (u32, u32));
    fn scale(&self, category: ImageCategory) -> Option<u32>;
    fn set_scale(&mut self, category: ImageCategory, scale: u32);
    /// Flush to backing storage, if any.
    fn save(&mut self) -> io::Result<()>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerPrefs {
    pub window_size: Option<(u32, u32)>,
    pub scales: HashMap<ImageCategory, u32>,
}

impl PickerPrefs {
    pub fn parse(txt: &str) -> Self {
        let mut out = Self::default();
        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let k = k.trim();
            let v = v.trim();

            if k == "window_size" {
                if let Some((w, h)) = v.split_once('x') {
                    if let (Ok(w), Ok(h)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
                        out.window_size = Some((w, h));
                    }
                }
            } else if let Some(name) = k.strip_prefix("scale.") {
                match (ImageCategory::from_str(name), v.parse::<u32>()) {
                    (Some(cat), Ok(n)) => {
                        out.scales.insert(cat, n);
                    }
                    _ => debug!("ignoring pref line `{line}`"),
                }
            }
        }
        out
    }

    pub fn render(&self) -> String {
        let mut txt = String::from("# artpick prefs\n");
        if let Some((w, h)) = self.window_size {
            txt.push_str(&format!("window_size={w}x{h}\n"));
        }
        // Stable order keeps the file diffable.
        for cat in ImageCategory::ALL {
            if let Some(scale) = self.scales.get(&cat) {
                txt.push_str(&format!("scale.{}={scale}\n", cat.as_str()));
            }
        }
        txt
    }
}

/// Prefs kept in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryPrefs {
    pub prefs: PickerPrefs,
    pub saves: usize,
}

impl PreferenceStore for MemoryPrefs {
    fn window_size(&self) -> Option<(u32, u32)> {
        self.prefs.window_size
    }

    fn set_window_size(&mut self, size: (u32, u32)) {
        self.prefs.window_size = Some(size);
    }

    fn scale(&self, category: ImageCategory) -> Option<u32> {
        self.prefs.scales.get(&category).copied()
    }

    fn set_scale(&mut self, category: ImageCategory, scale: u32) {
        self.prefs.scales.insert(category, scale);
    }

    fn save(&mut self) -> io::Result<()> {
        self.saves += 1;
        Ok(())
    }
}

/// Prefs persisted as `key=value` lines.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    prefs: PickerPrefs,
    dirty: bool,
}

impl FilePrefs {
    /// A missing or unreadable file yields empty prefs.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match fs::read_to_string(&path) {
            Ok(txt) => PickerPrefs::parse(&txt),
            Err(e) if e.kind() == io::ErrorKind::NotFound => PickerPrefs::default(),
            Err(e) => {
                warn!("failed to read prefs {}: {e}", path.display());
                PickerPrefs::default()
            }
        };
        Self {
            path,
            prefs,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePrefs {
    fn window_size(&self) -> Option<(u32, u32)> {
        self.prefs.window_size
    }

    fn set_window_size(&mut self, size: (u32, u32)) {
        if self.prefs.window_size != Some(size) {
            self.prefs.window_size = Some(size);
            self.dirty = true;
        }
    }

    fn scale(&self, category: ImageCategory) -> Option<u32> {
        self.prefs.scales.get(&category).copied()
    }

    fn set_scale(&mut self, category: ImageCategory, scale: u32) {
        if self.prefs.scales.insert(category, scale) != Some(scale) {
            self.dirty = true;
        }
    }

    fn save(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("part");
        fs::write(&tmp, self.prefs.render())?;
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_skips_junk() {
        let txt = "# comment\n\
                   window_size = 1200x850\n\
                   scale.poster=10\n\
                   scale.backdrop=6\n\
                   scale.fanart=3\n\
                   scale.banner=wide\n\
                   nonsense\n";
        let p = PickerPrefs::parse(txt);
        assert_eq!(p.window_size, Some((1200, 850)));
        assert_eq!(p.scales.get(&ImageCategory::Poster), Some(&10));
        assert_eq!(p.scales.get(&ImageCategory::Backdrop), Some(&6));
        assert_eq!(p.scales.len(), 2);
    }

    #[test]
    fn file_prefs_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.txt");

        let mut prefs = FilePrefs::load(&path);
        assert_eq!(prefs.scale(ImageCategory::Logo), None);
        prefs.set_scale(ImageCategory::Logo, 5);
        prefs.set_scale(ImageCategory::SeasonPoster, 12);
        prefs.set_window_size((900, 700));
        prefs.save().unwrap();

        let again = FilePrefs::load(&path);
        assert_eq!(again.scale(ImageCategory::Logo), Some(5));
        assert_eq!(again.scale(ImageCategory::SeasonPoster), Some(12));
        assert_eq!(again.window_size(), Some((900, 700)));
    }

    #[test]
    fn clean_prefs_do_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.txt");
        let mut prefs = FilePrefs::load(&path);
        prefs.save().unwrap();
        assert!(!path.exists());
    }
}

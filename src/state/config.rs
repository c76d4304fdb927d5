use crate::git::{ErrorReporter, GitError};
use crate::graph::{PlotGeometry, DEFAULT_FILL_LIMIT};
use crate::render::{parse_hex_color, to_hex_color, LabelColorRule, LabelColors, DEFAULT_PALETTE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "histgraph";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: (f32, f32),
    pub recent_repositories: Vec<PathBuf>,
    pub max_recent_repos: usize,
    /// Most commits laid out per refresh
    pub commit_limit: usize,
    pub selection_mode: SelectionMode,
    pub graph: GraphSettings,
    pub diff_settings: DiffSettings,
}

/// How clicks on commits change the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Exclusive,
    Toggle,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub lane_width: i32,
    pub row_height: i32,
    pub line_width: i32,
    pub palette: Vec<String>, // hex colors
    pub label_rules: Vec<LabelColorRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    pub max_file_size_kb: u64, // Skip diffing files larger than this
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: (1200.0, 800.0),
            recent_repositories: Vec::new(),
            max_recent_repos: 10,
            commit_limit: DEFAULT_FILL_LIMIT,
            selection_mode: SelectionMode::Exclusive,
            graph: GraphSettings::default(),
            diff_settings: DiffSettings::default(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        let geometry = PlotGeometry::pixels();
        Self {
            lane_width: geometry.lane_width,
            row_height: geometry.row_height,
            line_width: geometry.line_width,
            palette: DEFAULT_PALETTE.iter().map(|c| to_hex_color(*c)).collect(),
            label_rules: vec![
                LabelColorRule {
                    pattern: "^refs/heads/feature/".to_string(),
                    color: "#1976D2".to_string(),
                },
                LabelColorRule {
                    pattern: "^refs/heads/hotfix/".to_string(),
                    color: "#D32F2F".to_string(),
                },
            ],
        }
    }
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            max_file_size_kb: 1024, // 1MB
        }
    }
}

impl GraphSettings {
    /// Pixel geometry with the configured sizes. Values below 1 fall back to
    /// the defaults.
    pub fn geometry(&self) -> PlotGeometry {
        let defaults = PlotGeometry::pixels();
        let pick = |value: i32, fallback: i32| if value > 0 { value } else { fallback };
        PlotGeometry {
            lane_width: pick(self.lane_width, defaults.lane_width),
            row_height: pick(self.row_height, defaults.row_height),
            line_width: pick(self.line_width, defaults.line_width),
            ..defaults
        }
    }

    /// Parsed palette; invalid entries are skipped and an empty result falls
    /// back to the built-in colors.
    pub fn palette_colors(&self) -> Vec<egui::Color32> {
        let colors: Vec<egui::Color32> = self
            .palette
            .iter()
            .filter_map(|hex| {
                let color = parse_hex_color(hex);
                if color.is_none() {
                    let error = GitError::configuration("graph.palette", format!("invalid color {}", hex));
                    ErrorReporter::log_error(&error, "reading graph settings");
                }
                color
            })
            .collect();
        if colors.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            colors
        }
    }

    pub fn label_colors(&self) -> LabelColors {
        LabelColors::from_rules(&self.label_rules)
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Read `path`, falling back to defaults when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                ErrorReporter::log_error(&e, &format!("loading {}", path.display()));
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, GitError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), GitError> {
        let path = Self::config_path()
            .ok_or_else(|| GitError::configuration("config_dir", "no configuration directory on this platform"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GitError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to the default location, logging instead of returning failures
    pub fn persist(&self) {
        if let Err(e) = self.save() {
            ErrorReporter::log_error(&e, "saving configuration");
        }
    }

    pub fn add_recent_repository(&mut self, path: PathBuf) {
        self.recent_repositories.retain(|p| p != &path);
        self.recent_repositories.insert(0, path);
        self.recent_repositories.truncate(self.max_recent_repos);
    }

    pub fn remove_recent_repository(&mut self, path: &Path) {
        self.recent_repositories.retain(|p| p != path);
    }
}

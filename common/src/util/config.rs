use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            build: BuildConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_tileconn_file")]
    pub tileconn_file: String,
    #[serde(default = "default_grid_file")]
    pub grid_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tileconn_file: default_tileconn_file(),
            grid_file: default_grid_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BuildConfig {
    /// Worker threads for the walk and edge emission; 0 uses rayon's default pool.
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_validate")]
    pub validate: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            validate: default_validate(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_graph_file")]
    pub graph_file: String,
    #[serde(default = "default_heatmap_file")]
    pub heatmap_file: Option<String>,
    #[serde(default = "default_heatmap_size")]
    pub heatmap_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_file: default_graph_file(),
            heatmap_file: default_heatmap_file(),
            heatmap_size: default_heatmap_size(),
        }
    }
}

fn default_tileconn_file() -> String {
    "inputs/tileconn.json".to_string()
}

fn default_grid_file() -> String {
    "inputs/device.grid".to_string()
}

fn default_threads() -> usize {
    0
}

fn default_validate() -> bool {
    true
}

fn default_graph_file() -> String {
    "output/rr_graph.json".to_string()
}

fn default_heatmap_file() -> Option<String> {
    Some("output/channels.png".to_string())
}

fn default_heatmap_size() -> u32 {
    800
}

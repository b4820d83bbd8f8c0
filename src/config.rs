use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Static, load-time page configuration
///
/// Every component receives the section it needs at construction time; there
/// is no runtime reconfiguration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terminal: TerminalConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub loading: LoadingConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Typing terminal pacing and script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Delay after each revealed character
    #[serde(default = "default_typing_speed")]
    pub typing_speed_ms: u64,

    /// Delay after each removed character
    #[serde(default = "default_deleting_speed")]
    pub deleting_speed_ms: u64,

    #[serde(default = "default_pause_after_type")]
    pub pause_after_type_ms: u64,

    /// How long the output block stays up before deleting starts
    #[serde(default = "default_output_hold")]
    pub output_hold_ms: u64,

    #[serde(default = "default_restart_pause")]
    pub restart_pause_ms: u64,

    #[serde(default = "default_commands")]
    pub commands: Vec<String>,

    #[serde(default = "default_outputs")]
    pub outputs: BTreeMap<String, String>,

    /// Output for commands missing from `outputs`
    #[serde(default = "default_command_output")]
    pub default_output: String,

    #[serde(default = "default_command_region")]
    pub command_region: String,

    #[serde(default = "default_output_region")]
    pub output_region: String,
}

fn default_typing_speed() -> u64 {
    50
}

fn default_deleting_speed() -> u64 {
    30
}

fn default_pause_after_type() -> u64 {
    1000
}

fn default_output_hold() -> u64 {
    2000
}

fn default_restart_pause() -> u64 {
    500
}

fn default_commands() -> Vec<String> {
    [
        "whoami",
        "ls -la skills/",
        "cat experience.txt",
        "git status",
        "npm run portfolio",
        "echo \"Welcome to my portfolio!\"",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_outputs() -> BTreeMap<String, String> {
    [
        (
            "whoami",
            "asim-merchant\nSenior Firmware Development Engineer\nEmbedded Systems Specialist",
        ),
        (
            "ls -la skills/",
            "drwxr-xr-x  embedded-c/\ndrwxr-xr-x  python/\ndrwxr-xr-x  freertos/\ndrwxr-xr-x  wi-sun/",
        ),
        (
            "cat experience.txt",
            "Experience: 7+ years\nSpecialty: Embedded Systems\nCurrent: Senior Engineer @ Altimetrik",
        ),
        (
            "git status",
            "On branch main\nYour portfolio is up to date.",
        ),
        (
            "npm run portfolio",
            "Building amazing embedded solutions...\n✓ Compiled successfully!",
        ),
        (
            "echo \"Welcome to my portfolio!\"",
            "Welcome to my portfolio!\nExplore my projects and experience below.",
        ),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub(crate) fn default_command_output() -> String {
    "Command completed successfully.".to_string()
}

fn default_command_region() -> String {
    "typing-command".to_string()
}

fn default_output_region() -> String {
    "terminal-output".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: default_typing_speed(),
            deleting_speed_ms: default_deleting_speed(),
            pause_after_type_ms: default_pause_after_type(),
            output_hold_ms: default_output_hold(),
            restart_pause_ms: default_restart_pause(),
            commands: default_commands(),
            outputs: default_outputs(),
            default_output: default_command_output(),
            command_region: default_command_region(),
            output_region: default_output_region(),
        }
    }
}

/// GitHub widget account and fallback content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_username")]
    pub username: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Maximum number of repositories requested and rendered
    #[serde(default = "default_repo_limit")]
    pub repo_limit: usize,

    /// Bio shown when the profile has none
    #[serde(default = "default_tagline")]
    pub default_bio: String,

    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,

    #[serde(default = "default_tagline")]
    pub fallback_tagline: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_github_username() -> String {
    "AsimMerchant".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_repo_limit() -> usize {
    6
}

fn default_tagline() -> String {
    "Senior Firmware Development Engineer".to_string()
}

fn default_fallback_name() -> String {
    "Asim Merchant".to_string()
}

fn default_user_agent() -> String {
    concat!("portfolio-page/", env!("CARGO_PKG_VERSION")).to_string()
}

impl GithubConfig {
    /// Public profile page used by the fallback block.
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.username)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: default_github_username(),
            api_base: default_api_base(),
            repo_limit: default_repo_limit(),
            default_bio: default_tagline(),
            fallback_name: default_fallback_name(),
            fallback_tagline: default_tagline(),
            user_agent: default_user_agent(),
        }
    }
}

/// Scroll thresholds and navigation geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Added to `scrollY` before looking up the current section
    #[serde(default = "default_nav_offset")]
    pub nav_offset: f64,

    #[serde(default = "default_navbar_threshold")]
    pub navbar_threshold: f64,

    #[serde(default = "default_back_to_top_threshold")]
    pub back_to_top_threshold: f64,

    /// Viewport width above which the mobile menu is closed on resize
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: f64,

    #[serde(default = "default_scroll_throttle")]
    pub throttle_ms: u64,
}

fn default_nav_offset() -> f64 {
    100.0
}

fn default_navbar_threshold() -> f64 {
    50.0
}

fn default_back_to_top_threshold() -> f64 {
    500.0
}

fn default_mobile_breakpoint() -> f64 {
    768.0
}

fn default_scroll_throttle() -> u64 {
    16
}

impl ScrollConfig {
    pub fn throttle(&self) -> Duration {
        ms(self.throttle_ms)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            nav_offset: default_nav_offset(),
            navbar_threshold: default_navbar_threshold(),
            back_to_top_threshold: default_back_to_top_threshold(),
            mobile_breakpoint: default_mobile_breakpoint(),
            throttle_ms: default_scroll_throttle(),
        }
    }
}

/// Counter, skill-bar and reveal timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_ramp_duration")]
    pub ramp_duration_ms: u64,

    #[serde(default = "default_tick")]
    pub tick_ms: u64,

    /// Delay before a skill bar starts filling
    #[serde(default = "default_skill_bar_delay")]
    pub skill_bar_delay_ms: u64,

    /// Margin trimmed from the top and bottom of the viewport for reveals
    #[serde(default = "default_trigger_offset")]
    pub trigger_offset: f64,

    /// Fraction of an element that must be visible to reveal it
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,

    #[serde(default = "default_entrance_stagger")]
    pub entrance_stagger_ms: u64,
}

fn default_ramp_duration() -> u64 {
    2000
}

fn default_tick() -> u64 {
    16
}

fn default_skill_bar_delay() -> u64 {
    300
}

fn default_trigger_offset() -> f64 {
    100.0
}

fn default_visibility_threshold() -> f64 {
    0.1
}

fn default_entrance_stagger() -> u64 {
    200
}

impl AnimationConfig {
    pub fn ramp_duration(&self) -> Duration {
        ms(self.ramp_duration_ms)
    }

    pub fn tick(&self) -> Duration {
        ms(self.tick_ms)
    }

    pub fn skill_bar_delay(&self) -> Duration {
        ms(self.skill_bar_delay_ms)
    }

    pub fn entrance_stagger(&self) -> Duration {
        ms(self.entrance_stagger_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            ramp_duration_ms: default_ramp_duration(),
            tick_ms: default_tick(),
            skill_bar_delay_ms: default_skill_bar_delay(),
            trigger_offset: default_trigger_offset(),
            visibility_threshold: default_visibility_threshold(),
            entrance_stagger_ms: default_entrance_stagger(),
        }
    }
}

/// Loading screen timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingConfig {
    #[serde(default = "default_loading_display")]
    pub display_ms: u64,

    #[serde(default = "default_loading_fade")]
    pub fade_ms: u64,
}

fn default_loading_display() -> u64 {
    2000
}

fn default_loading_fade() -> u64 {
    500
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            display_ms: default_loading_display(),
            fade_ms: default_loading_fade(),
        }
    }
}

impl LoadingConfig {
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

/// Contact form timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Simulated network round-trip of the default sender
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,

    /// Time the success/error label stays before the button is restored
    #[serde(default = "default_restore_delay")]
    pub restore_delay_ms: u64,
}

fn default_simulated_delay() -> u64 {
    2000
}

fn default_restore_delay() -> u64 {
    3000
}

impl ContactConfig {
    pub fn simulated_delay(&self) -> Duration {
        ms(self.simulated_delay_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        ms(self.restore_delay_ms)
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay(),
            restore_delay_ms: default_restore_delay(),
        }
    }
}

/// Toast notification timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_slide_in")]
    pub slide_in_ms: u64,

    #[serde(default = "default_auto_dismiss")]
    pub auto_dismiss_ms: u64,

    #[serde(default = "default_exit_transition")]
    pub exit_transition_ms: u64,
}

fn default_slide_in() -> u64 {
    100
}

fn default_auto_dismiss() -> u64 {
    5000
}

fn default_exit_transition() -> u64 {
    300
}

impl NotificationConfig {
    pub fn slide_in(&self) -> Duration {
        ms(self.slide_in_ms)
    }

    pub fn auto_dismiss(&self) -> Duration {
        ms(self.auto_dismiss_ms)
    }

    pub fn exit_transition(&self) -> Duration {
        ms(self.exit_transition_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            slide_in_ms: default_slide_in(),
            auto_dismiss_ms: default_auto_dismiss(),
            exit_transition_ms: default_exit_transition(),
        }
    }
}

/// Log filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber` filter directive, e.g. `"info,portfolio=debug"`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Parse a configuration document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terminal.commands.is_empty() {
            return Err(ConfigError::ValidationError(
                "terminal.commands must not be empty".to_string(),
            ));
        }

        if self.github.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "github.username must not be empty".to_string(),
            ));
        }

        // Interpolated into API paths as-is.
        if !self
            .github
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::ValidationError(format!(
                "github.username {:?} is not a valid GitHub login",
                self.github.username
            )));
        }

        if self.github.repo_limit == 0 || self.github.repo_limit > 100 {
            return Err(ConfigError::ValidationError(
                "github.repo_limit must be between 1 and 100".to_string(),
            ));
        }

        if self.animation.tick_ms == 0 {
            return Err(ConfigError::ValidationError(
                "animation.tick_ms must be greater than 0".to_string(),
            ));
        }

        if self.animation.ramp_duration_ms < self.animation.tick_ms {
            return Err(ConfigError::ValidationError(
                "animation.ramp_duration_ms must be at least one tick".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.animation.visibility_threshold) {
            return Err(ConfigError::ValidationError(
                "animation.visibility_threshold must be within 0.0..=1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

use crate::adapters::fpl::DEFAULT_BASE_URL;
use crate::core::partition::{PartitionMode, MAX_GROUPS, MIN_GROUPS};
use crate::core::tournament::TournamentSettings;
use crate::domain::model::{Legs, ParticipantId, TimeSlot};
use crate::render::OutputFormat;
use crate::utils::error::{CupError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// FPL 一季的比賽週範圍
pub const FIRST_GAMEWEEK: u32 = 1;
pub const LAST_GAMEWEEK: u32 = 38;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub tournament: TournamentSection,
    pub source: SourceConfig,
    /// 手動分組：組名 -> 參賽者 id；沒有這段就隨機平均分組
    pub groups: Option<BTreeMap<String, Vec<u64>>>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSection {
    pub name: String,
    pub group_count: usize,
    pub matches_per_opponent: u8,
    pub gameweeks: Vec<u32>,
    pub seed: Option<u64>,
    pub current_gameweek: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String, // "fpl" 或 "file"
    pub base_url: Option<String>,
    pub league_id: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub roster_path: Option<String>,
    pub results_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub show_fixtures: Option<bool>,
}

impl TournamentConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FPL_LEAGUE_ID})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CupError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let t = &self.tournament;
        validation::validate_non_empty_string("tournament.name", &t.name)?;
        validation::validate_range("tournament.group_count", t.group_count, MIN_GROUPS, MAX_GROUPS)?;
        validation::validate_range("tournament.matches_per_opponent", t.matches_per_opponent, 1, 2)?;

        if t.gameweeks.is_empty() {
            return Err(CupError::InvalidConfigValueError {
                field: "tournament.gameweeks".to_string(),
                value: "[]".to_string(),
                reason: "Select at least one gameweek".to_string(),
            });
        }
        for gameweek in &t.gameweeks {
            validation::validate_range("tournament.gameweeks", *gameweek, FIRST_GAMEWEEK, LAST_GAMEWEEK)?;
        }
        validation::validate_strictly_ascending("tournament.gameweeks", &t.gameweeks)?;

        if let Some(current) = t.current_gameweek {
            validation::validate_range("tournament.current_gameweek", current, FIRST_GAMEWEEK, LAST_GAMEWEEK)?;
        }

        match self.source.r#type.as_str() {
            "fpl" => {
                validation::validate_url("source.base_url", self.base_url())?;
                validation::validate_required_field("source.league_id", &self.source.league_id)?;
            }
            "file" => {
                let roster = validation::validate_required_field("source.roster_path", &self.source.roster_path)?;
                validation::validate_path("source.roster_path", roster)?;
                let results = validation::validate_required_field("source.results_path", &self.source.results_path)?;
                validation::validate_path("source.results_path", results)?;
            }
            other => {
                return Err(CupError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Supported sources: fpl, file".to_string(),
                })
            }
        }

        if let Some(groups) = &self.groups {
            if groups.len() != t.group_count {
                return Err(CupError::ConfigValidationError {
                    field: "groups".to_string(),
                    message: format!(
                        "{} groups listed but tournament.group_count is {}",
                        groups.len(),
                        t.group_count
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.source.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn legs(&self) -> Result<Legs> {
        Legs::try_from(self.tournament.matches_per_opponent)
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        self.tournament.gameweeks.iter().copied().map(TimeSlot).collect()
    }

    pub fn current_slot(&self) -> Option<TimeSlot> {
        self.tournament.current_gameweek.map(TimeSlot)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    pub fn show_fixtures(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.show_fixtures)
            .unwrap_or(false)
    }

    /// `[groups]` 反轉成 參賽者 -> 組名
    pub fn partition_mode(&self) -> Result<PartitionMode> {
        let Some(groups) = &self.groups else {
            return Ok(PartitionMode::Balanced {
                seed: self.tournament.seed,
            });
        };

        let mut assignments = BTreeMap::new();
        for (name, members) in groups {
            for id in members {
                if let Some(previous) = assignments.insert(ParticipantId(*id), name.clone()) {
                    return Err(CupError::validation(format!(
                        "participant {} is listed in both '{}' and '{}'",
                        id, previous, name
                    )));
                }
            }
        }
        Ok(PartitionMode::Manual(assignments))
    }

    pub fn settings(&self) -> Result<TournamentSettings> {
        Ok(TournamentSettings {
            name: self.tournament.name.clone(),
            group_count: self.tournament.group_count,
            legs: self.legs()?,
            slots: self.slots(),
            mode: self.partition_mode()?,
        })
    }
}

impl Validate for TournamentConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[tournament]
name = "Office Cup"
group_count = 2
matches_per_opponent = 1
gameweeks = [20, 21, 22, 23]
seed = 7

[source]
type = "fpl"
league_id = 857
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TournamentConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.tournament.name, "Office Cup");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.legs().unwrap(), Legs::Single);
        assert_eq!(config.slots().first(), Some(&TimeSlot(20)));
        assert_eq!(config.output_format(), OutputFormat::Table);
        assert_eq!(
            config.partition_mode().unwrap(),
            PartitionMode::Balanced { seed: Some(7) }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FPL_CUP_TEST_LEAGUE", "314159");

        let toml_content = r#"
[tournament]
name = "Env Cup"
group_count = 2
matches_per_opponent = 2
gameweeks = [1, 2, 3]

[source]
type = "fpl"
league_id = ${FPL_CUP_TEST_LEAGUE}
"#;

        let config = TournamentConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.league_id, Some(314159));

        std::env::remove_var("FPL_CUP_TEST_LEAGUE");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TournamentConfig::from_toml_str(BASIC).unwrap();
        config.tournament.group_count = 9;
        assert!(config.validate().is_err());

        let mut config = TournamentConfig::from_toml_str(BASIC).unwrap();
        config.tournament.gameweeks = vec![3, 2];
        assert!(config.validate().is_err());

        let mut config = TournamentConfig::from_toml_str(BASIC).unwrap();
        config.tournament.gameweeks = vec![38, 39];
        assert!(config.validate().is_err());

        let mut config = TournamentConfig::from_toml_str(BASIC).unwrap();
        config.source.league_id = None;
        assert!(matches!(
            config.validate(),
            Err(CupError::MissingConfigError { .. })
        ));

        let mut config = TournamentConfig::from_toml_str(BASIC).unwrap();
        config.source.r#type = "csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manual_groups() {
        let toml_content = format!(
            "{}\n[groups]\n\"Group A\" = [1, 3]\n\"Group B\" = [2, 4]\n",
            BASIC
        );
        let config = TournamentConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_ok());

        match config.partition_mode().unwrap() {
            PartitionMode::Manual(assignments) => {
                assert_eq!(assignments.len(), 4);
                assert_eq!(assignments[&ParticipantId(3)], "Group A");
                assert_eq!(assignments[&ParticipantId(4)], "Group B");
            }
            other => panic!("expected manual mode, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_groups_duplicate_member() {
        let toml_content = format!(
            "{}\n[groups]\n\"Group A\" = [1, 2]\n\"Group B\" = [2, 3]\n",
            BASIC
        );
        let config = TournamentConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.partition_mode(),
            Err(CupError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_file_source_requires_paths() {
        let toml_content = r#"
[tournament]
name = "Offline Cup"
group_count = 2
matches_per_opponent = 1
gameweeks = [1, 2, 3]

[source]
type = "file"
roster_path = "data.json"
"#;
        let config = TournamentConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(CupError::MissingConfigError { field }) if field == "source.results_path"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = format!("{}\n[output]\nformat = \"csv\"\nshow_fixtures = true\n", BASIC);
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TournamentConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.tournament.name, "Office Cup");
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert!(config.show_fixtures());
    }
}

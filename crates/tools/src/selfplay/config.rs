//! 陣営ごとの重み設定（TOML）
//!
//! ```toml
//! [attacker]
//! total_diff = 3.0
//! will_be_captured = 6.0
//!
//! [defender]
//! king_mobility_diff = 2.0
//! ```
//!
//! 省略した項目は既定の重み。

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tablut_core::{Side, Weights};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfplayConfig {
    pub attacker: Weights,
    pub defender: Weights,
}

impl SelfplayConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid selfplay config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// 単独の重みファイル（テーブルなし）を読む
    pub fn load_weights(path: &Path) -> Result<Weights> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid weights in {}", path.display()))
    }

    pub fn weights(&self, side: Side) -> &Weights {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    pub fn set_weights(&mut self, side: Side, weights: Weights) {
        match side {
            Side::Attacker => self.attacker = weights,
            Side::Defender => self.defender = weights,
        }
    }
}

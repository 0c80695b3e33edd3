//! コントローラのライフサイクル状態

/// Uninstalled → Installing → Waiting → Active。置き換えられた・インストールに失敗した版は Redundant。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninstalled,
    Installing,
    /// インストール済み。旧版の終了待ち（skip_waiting なら即座に有効化してよい）
    Waiting,
    Active,
    Redundant,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Uninstalled => "uninstalled",
            ControllerState::Installing => "installing",
            ControllerState::Waiting => "waiting",
            ControllerState::Active => "active",
            ControllerState::Redundant => "redundant",
        }
    }
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Severity, WarningKind};

/// advisory raised while simulating; never stops the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationWarning {
    pub kind: WarningKind,
    pub month: u32,
    pub message: String,
    pub severity: Severity,
    pub config_id: Option<Uuid>,
    pub label: Option<String>,
}

impl SimulationWarning {
    pub fn allowance_exceeded(
        month: u32,
        config_id: Uuid,
        label: Option<String>,
        message: String,
    ) -> Self {
        Self {
            kind: WarningKind::AllowanceExceeded,
            month,
            message,
            severity: Severity::Warning,
            config_id: Some(config_id),
            label,
        }
    }

    pub fn transaction_limit_exceeded(
        month: u32,
        config_id: Uuid,
        label: Option<String>,
        message: String,
    ) -> Self {
        Self {
            kind: WarningKind::TransactionLimitExceeded,
            month,
            message,
            severity: Severity::Warning,
            config_id: Some(config_id),
            label,
        }
    }

    pub fn early_redemption(month: u32, label: Option<String>, message: String) -> Self {
        Self {
            kind: WarningKind::EarlyRedemption,
            month,
            message,
            severity: Severity::Error,
            config_id: None,
            label,
        }
    }
}

/// collects warnings during a single simulation run
#[derive(Debug, Default)]
pub struct WarningLog {
    warnings: Vec<SimulationWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn emit(&mut self, warning: SimulationWarning) {
        self.warnings.push(warning);
    }

    pub fn take_warnings(&mut self) -> Vec<SimulationWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[SimulationWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

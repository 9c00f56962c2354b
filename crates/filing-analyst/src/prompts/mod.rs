//! Prompt templates for filing analysts
//!
//! Templates are registered once in a shared `minijinja` environment under
//! `<analyst>.system` and `<analyst>.user` names:
//! - `system`: instructions for each analyst
//! - `user`: message templates filled with filing text

mod system;
mod user;

use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;

pub const SUMMARY_SYSTEM: &str = "summary.system";
pub const SUMMARY_USER: &str = "summary.user";
pub const RISK_SYSTEM: &str = "risk.system";
pub const RISK_USER: &str = "risk.user";
pub const KPI_SYSTEM: &str = "kpi.system";
pub const KPI_USER: &str = "kpi.user";
pub const QA_SYSTEM: &str = "qa.system";
pub const QA_USER: &str = "qa.user";

const TEMPLATES: [(&str, &str); 8] = [
    (SUMMARY_SYSTEM, system::SUMMARY),
    (SUMMARY_USER, user::SUMMARY),
    (RISK_SYSTEM, system::RISK),
    (RISK_USER, user::RISK),
    (KPI_SYSTEM, system::KPI),
    (KPI_USER, user::KPI),
    (QA_SYSTEM, system::QA),
    (QA_USER, user::QA),
];

/// Registry of analyst prompt templates
#[derive(Debug)]
pub struct Prompts {
    env: Environment<'static>,
}

impl Prompts {
    /// Create a registry with every analyst template compiled
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a template with serializable variables
    pub fn render<S: Serialize>(&self, name: &str, vars: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(vars)?)
    }

    /// Names of all registered templates
    pub fn names() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }
}

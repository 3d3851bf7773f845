use anyhow::Result;
use clap::Args;
use kubedeploy::config::Configuration;

/// Print the JSON schema of the deployment config.
#[derive(Clone, Debug, Args)]
#[command(name = "schema")]
pub struct Schema {}

impl Schema {
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn run(self) -> Result<()> {
        let schema = schemars::schema_for!(Configuration);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

mod computation;

use std::sync::Arc;

use log::{debug, error, info};

use crate::cancel::Interruption;
use crate::cli::{BlocksArgs, Command, LoadArgs, RunArgs};
use crate::config::Config;
use crate::index_block::{IndexBlockError, IndexBlockGroup};
use crate::io::{self, DeserializeError, JsonDeserializer, Model};
use crate::signal::{self, InterruptHandler, SignalBus, SignalError};

pub use computation::{RunReport, RunStatus, SeriesComputation};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    IndexBlock(#[from] IndexBlockError),
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

pub struct App {
    config: Config,
    handler: Arc<InterruptHandler>,
}

impl App {
    pub fn new(config: Config, handler: Arc<InterruptHandler>) -> Self {
        handler.set_active(config.handler_active);
        Self { config, handler }
    }

    /// App on the real terminal with a fresh bus.
    pub fn with_stdio(config: Config) -> Self {
        let bus = Arc::new(SignalBus::new());
        Self::new(config, Arc::new(InterruptHandler::stdio(bus)))
    }

    pub fn bus(&self) -> &Arc<SignalBus> {
        self.handler.bus()
    }

    pub fn run(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Run(args) => self.handle_run(args),
            Command::Blocks(args) => self.handle_blocks(args),
            Command::Load(args) => self.handle_load(args),
        }
    }

    fn handle_run(&mut self, args: RunArgs) -> Result<(), AppError> {
        self.install_trap()?;

        let report = self.run_computation(&args);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "{:?} after {}/{} steps: {:.10}",
                report.status, report.completed_steps, report.total_steps, report.value
            );
        }
        Ok(())
    }

    fn handle_blocks(&mut self, args: BlocksArgs) -> Result<(), AppError> {
        let ind = self.slep_ind(args)?;
        let rendered: Vec<String> = ind.iter().map(|i| i.to_string()).collect();
        println!("[{}]", rendered.join(", "));
        Ok(())
    }

    fn handle_load(&mut self, args: LoadArgs) -> Result<(), AppError> {
        let model = self.load_model(&args)?;
        println!("{}", model.name);
        for (key, value) in &model.params {
            println!("  {} = {}", key, value);
        }
        Ok(())
    }

    fn install_trap(&self) -> Result<(), AppError> {
        match signal::install(Arc::clone(&self.handler)) {
            Ok(()) => {
                if self.handler.is_active() {
                    info!("Press Ctrl+C to pause, cancel or quit");
                }
                Ok(())
            }
            Err(SignalError::AlreadyInstalled) => {
                debug!("Interrupt handler already installed");
                Ok(())
            }
            Err(err) => {
                error!("Could not install interrupt handler: {}", err);
                Err(err.into())
            }
        }
    }

    /// Run the demo computation against this app's bus.
    pub fn run_computation(&self, args: &RunArgs) -> RunReport {
        let config = self.config.clone().with_overrides(None, args.step_ms);
        let mut interruption = Interruption::new(self.bus());
        SeriesComputation::new(args.steps, config.step_delay).run(&mut interruption)
    }

    pub fn slep_ind(&self, args: BlocksArgs) -> Result<Vec<usize>, AppError> {
        let group: IndexBlockGroup = args.blocks.into_iter().collect();
        Ok(group.slep_ind()?)
    }

    pub fn load_model(&self, args: &LoadArgs) -> Result<Model, AppError> {
        let mut deserializer = JsonDeserializer::new();
        Ok(io::deserialize(&args.path, &mut deserializer)?)
    }
}

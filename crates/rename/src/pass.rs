//! Module-pass contract for embedding the renamer in a compiler pipeline.
//!
//! Hosts that drive passes by pipeline name resolve `symbol-obfuscation`
//! through [`lookup_pass`] and run the result over each module.

use crate::driver::{RenameConfig, RenameDriver};
use crate::Result;
use symveil_core::ir::IrModule;

/// Pipeline name the obfuscation pass registers under.
pub const PIPELINE_NAME: &str = "symbol-obfuscation";

/// A module-level transformation pass.
pub trait ModulePass {
    /// Returns the pass's name for logging and pipeline registration.
    fn name(&self) -> &'static str;
    /// Runs on a module. Returns true when the module was modified, in which
    /// case the host must assume no analyses are preserved.
    fn run(&self, module: &mut IrModule) -> Result<bool>;
}

/// The symbol obfuscation pass.
pub struct SymbolObfuscationPass {
    config: RenameConfig,
}

impl SymbolObfuscationPass {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }
}

impl Default for SymbolObfuscationPass {
    fn default() -> Self {
        Self::new(RenameConfig::default())
    }
}

impl ModulePass for SymbolObfuscationPass {
    fn name(&self) -> &'static str {
        PIPELINE_NAME
    }

    fn run(&self, module: &mut IrModule) -> Result<bool> {
        let mut driver = RenameDriver::new(self.config.clone())?;
        let summary = driver.run_on_module(module)?;
        Ok(summary.renamed > 0)
    }
}

/// Resolves a pipeline name to a pass instance.
pub fn lookup_pass(name: &str) -> Option<Box<dyn ModulePass>> {
    match name {
        PIPELINE_NAME => Some(Box::<SymbolObfuscationPass>::default()),
        _ => None,
    }
}

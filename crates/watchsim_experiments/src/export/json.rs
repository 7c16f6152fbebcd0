use std::io::Write;

use watchsim_core::SimulationResult;

use crate::runner::BatchOutcome;

pub(crate) fn export_dataset_impl<W: Write>(
    result: &SimulationResult,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn export_summaries_impl<W: Write>(
    outcomes: &[BatchOutcome],
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut writer, outcomes)?;
    writer.flush()?;
    Ok(())
}

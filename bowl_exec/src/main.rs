//! Bowling machine setpoint generator entry point.
//!
//! # Architecture
//!
//! The executable runs once and exits:
//!
//!     - Initialise the session and logging
//!     - Load the parameters, applying any command line overrides
//!     - Load the calibration sheets into the calibration store
//!     - Resolve every control tuple into a setpoint
//!     - Write the dataset as JSON and CSV into the session directory
//!
//! The software root is taken from the `BOWL_SW_ROOT` environment variable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use structopt::StructOpt;

// Internal
use bowl_lib::{
    calib_store::{CalibrationStore, MeasurementClass},
    dataset::Dataset,
    failsafe::FailsafeEnforcer,
    params::BowlExecParams,
    resolver::ParamResolver,
    synth::{FormulaVariant, SynthEngine},
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Generate the full setpoint dataset for the bowling machine.
#[derive(Debug, StructOpt)]
#[structopt(name = "bowl_exec")]
struct Opts {
    /// Parameter file, relative to `$BOWL_SW_ROOT/params`
    #[structopt(short, long, default_value = "bowl_exec.toml")]
    params: String,

    /// Override the synthetic formula variant ("physical" or "linear")
    #[structopt(long)]
    variant: Option<FormulaVariant>,

    /// Override the random seed
    #[structopt(long)]
    seed: Option<u64>,

    /// Ignore the calibration sheets and synthesise every setpoint
    #[structopt(long)]
    no_calibration: bool,

    /// Don't write the JSON dataset
    #[structopt(long)]
    no_json: bool,

    /// Don't write the CSV dataset
    #[structopt(long)]
    no_csv: bool,

    /// Log how each tuple was resolved
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bowl_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Bowling Machine Setpoint Generator\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut params: BowlExecParams =
        util::params::load(&opts.params).wrap_err("Could not load bowl_exec params")?;

    if let Some(variant) = opts.variant {
        info!("Formula variant overridden to {:?}", variant);
        params.synth.variant = variant;
    }
    if let Some(seed) = opts.seed {
        info!("Seed overridden to {}", seed);
        params.dataset.seed = seed;
    }

    info!("Exec parameters loaded");

    // ---- LOAD CALIBRATION ----

    let store = if opts.no_calibration {
        info!("Calibration disabled, every setpoint will be synthesised");
        CalibrationStore::new()
    } else {
        let root = host::get_bowl_sw_root().wrap_err("Could not find the software root")?;

        CalibrationStore::load(&params.calibration, &root)
            .wrap_err("Failed to load the calibration sheets")?
    };

    for class in [
        MeasurementClass::Straight,
        MeasurementClass::Swing,
        MeasurementClass::Spin,
    ]
    .iter()
    {
        info!(
            "{:?} calibration: {} records, {} ambiguous keys",
            class,
            store.num_records(*class),
            store.num_ambiguous_keys(*class)
        );
    }
    if store.is_empty() {
        warn!("No calibration records available, every setpoint will be synthesised");
    }

    info!("Calibration loaded\n");

    // ---- GENERATE ----

    let resolver = ParamResolver::new(
        &store,
        SynthEngine::new(params.synth),
        FailsafeEnforcer::new(params.limits).with_output_decimals(params.dataset.decimals),
        params.sentinels,
    );

    let dataset = Dataset::generate(&resolver, &params.dataset);
    dataset.summary.log();

    // ---- WRITE OUTPUTS ----

    let decimals = params.dataset.decimals;

    if !opts.no_json {
        let path = session.path(&params.dataset.json_file_name);
        dataset
            .write_json(&path, decimals)
            .wrap_err("Failed to write the JSON dataset")?;
        info!("JSON dataset written to {:?}", path);
    }

    if !opts.no_csv {
        let mut archiver = Archiver::from_path(&session, &params.dataset.csv_file_name)
            .wrap_err("Failed to create the CSV dataset")?;
        let num_rows = dataset
            .archive(&mut archiver, decimals)
            .wrap_err("Failed to write the CSV dataset")?;
        info!("CSV dataset of {} rows written to {:?}", num_rows, archiver.path());
    }

    info!("End of execution");

    Ok(())
}

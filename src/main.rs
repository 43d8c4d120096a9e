use clap::{App, Arg};
use log::info;
use ndarray_stats::QuantileExt;

mod baum_welch;
mod utils;

use baum_welch::alphabet::Alphabet;
use baum_welch::hmm::Hmm;
use baum_welch::trainer::train;

// Row of the occupancy matrix used as the per-position score.
const GENE_BODY_STATE: usize = 1;

fn main() {
    env_logger::init();

    let matches = App::new("Gene body scanner")
        .version("0.1")
        .about("Two-state HMM gene body prediction trained with Baum-Welch")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("configuration file")
            .takes_value(true)
            .required(true))
        .get_matches();

    let config = if let Some(f) = matches.value_of("config") {
        utils::Config::from_config_file(std::path::PathBuf::from(f))
    } else {
        panic!("No config file provided")
    };

    let alphabet = Alphabet::from_symbols(config.alphabet());
    let raw = utils::load_fasta(config.input_path());
    let sequence = match alphabet.encode(&raw) {
        Ok(s) => s,
        Err(error) => {
            eprintln!("invalid input sequence: {}", error);
            std::process::exit(1);
        }
    };
    info!("loaded {} symbols from {:?}", sequence.len(), config.input_path());

    let hmm = if config.random_init() {
        Hmm::random(config.nstates(), alphabet.len())
    } else {
        match Hmm::new(config.get_transmatrix(), config.get_emissionmatrix()) {
            Ok(hmm) => hmm,
            Err(error) => {
                eprintln!("invalid initial model: {}", error);
                std::process::exit(1);
            }
        }
    };

    let outcome = match train(&sequence, hmm, config.iterations()) {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("training failed: {}", error);
            std::process::exit(1);
        }
    };

    let scores = outcome.occupancy.row(GENE_BODY_STATE);
    let peak = scores.argmax().unwrap();
    info!("highest gene body posterior {:.4} at position {}", scores[peak], peak + 1);

    let top = utils::select_top_k(scores, config.top_k());
    utils::write_predictions(config.output_path(), &top);
    info!("wrote {} predictions to {:?}", top.len(), config.output_path());

    if let Some(path) = config.model_path() {
        utils::write_model(path, &outcome.hmm);
        info!("wrote trained model to {:?}", path);
    }
}

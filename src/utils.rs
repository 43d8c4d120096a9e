use csv::ReaderBuilder;
use ndarray::{arr2, Array2, ArrayView1};
use ndarray_csv::Array2Reader;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use super::baum_welch::hmm::Hmm;

pub fn read_matrix(path: &PathBuf, nrows: usize, ncols: usize) -> Array2<f64> {
    let file = File::open(path).unwrap();
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);
    reader.deserialize_array2((nrows, ncols)).unwrap()
}

/// Concatenate the sequence lines of a FASTA-like file, skipping headers.
pub fn load_fasta(path: &PathBuf) -> String {
    let file = File::open(path).unwrap();
    let reader = BufReader::new(file);

    let mut sequence = String::new();
    for line in reader.lines() {
        let line = line.unwrap();
        if line.starts_with('>') {
            continue;
        }
        sequence.push_str(line.trim());
    }
    sequence
}

/// Indices of the k highest scores, returned in ascending index order.
pub fn select_top_k(scores: ArrayView1<f64>, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&i, &j| scores[j].partial_cmp(&scores[i]).unwrap());
    order.truncate(k);
    order.sort_unstable();
    order
}

/// Write 1-based positions, one per line.
pub fn write_predictions(path: &PathBuf, positions: &[usize]) {
    let mut file = File::create(path).unwrap();
    for position in positions {
        let s = format!("{}\n", position + 1);
        file.write(s.as_bytes()).expect("Can not write");
    }
}

pub fn write_model(path: &PathBuf, hmm: &Hmm) {
    let file = File::create(path).unwrap();
    serde_json::to_writer_pretty(file, hmm).unwrap();
}

pub fn default_transition() -> Array2<f64> {
    arr2(&[[0.9, 0.1], [0.1, 0.9]])
}

pub fn default_emission() -> Array2<f64> {
    arr2(&[[0.1, 0.1, 0.1, 0.7], [0.25, 0.25, 0.4, 0.1]])
}

pub const DEFAULT_ALPHABET: &str = "xyzn";

pub struct Config {
    input_path: PathBuf,
    output_path: PathBuf,
    hmm_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    alphabet: String,
    nstates: usize,
    iterations: usize,
    top_k: usize,
    random_init: bool,
}

impl Config {

    fn new() -> Self {
        Self {
            input_path: PathBuf::from("input.fasta"),
            output_path: PathBuf::from("predictions.csv"),
            hmm_path: None,
            model_path: None,
            alphabet: String::from(DEFAULT_ALPHABET),
            nstates: 2,
            iterations: 50,
            top_k: 50000,
            random_init: false,
        }
    }

    pub fn from_config_file(filename: PathBuf) -> Self {
        let mut instance = Config::new();
        let file = match File::open(filename) {
            Ok(f) => f,
            Err(error) => panic!("Can not open config file: {:?}", error),
        };

        let reader = BufReader::new(file);
        for line in reader.lines() {
            let line = line.unwrap();
            if line.is_empty() {
                continue;
            }
            let splits: Vec<&str> = line.split("=").collect();
            if splits.len() != 2 {
                panic!("Wrong line in config file");
            }
            let option = splits[0];
            let value = String::from(splits[1]);
            match option {
                "input_path" => instance.input_path = PathBuf::from(value),
                "output_path" => instance.output_path = PathBuf::from(value),
                "hmm_path" => instance.hmm_path = Some(PathBuf::from(value)),
                "model_path" => instance.model_path = Some(PathBuf::from(value)),
                "alphabet" => instance.alphabet = value,
                "iterations" => instance.iterations = value.parse().unwrap(),
                "top_k" => instance.top_k = value.parse().unwrap(),
                "init" => instance.random_init = match value.as_str() {
                    "random" => true,
                    "given" => false,
                    _ => panic!("Unknown init method: {:?}", value),
                },
                _ => panic!("Unknown option in config file: {:?}", option),
            };
        }
        instance
    }

    pub fn get_transmatrix(&self) -> Array2<f64> {
        match &self.hmm_path {
            Some(dir) => read_matrix(&dir.join("A"), self.nstates, self.nstates),
            None => default_transition(),
        }
    }

    pub fn get_emissionmatrix(&self) -> Array2<f64> {
        match &self.hmm_path {
            Some(dir) => read_matrix(&dir.join("b"), self.nstates, self.alphabet.len()),
            None => default_emission(),
        }
    }

    pub fn input_path(&self) -> &PathBuf {
        &self.input_path
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    pub fn model_path(&self) -> Option<&PathBuf> {
        self.model_path.as_ref()
    }

    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    pub fn nstates(&self) -> usize {
        self.nstates
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn random_init(&self) -> bool {
        self.random_init
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn top_k_returns_highest_scores_in_ascending_order() {
        let scores = arr1(&[0.1, 0.9, 0.3, 0.8, 0.2]);
        assert_eq!(select_top_k(scores.view(), 3), vec![1, 2, 3]);
        assert_eq!(select_top_k(scores.view(), 1), vec![1]);
    }

    #[test]
    fn top_k_larger_than_sequence_returns_everything() {
        let scores = arr1(&[0.3, 0.1]);
        assert_eq!(select_top_k(scores.view(), 10), vec![0, 1]);
    }

    #[test]
    fn fasta_headers_and_whitespace_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.fasta");
        let mut file = File::create(&path).unwrap();
        write!(file, ">seq1 test\nxxnn\nyyzz\n").unwrap();
        assert_eq!(load_fasta(&path), "xxnnyyzz");
    }

    #[test]
    fn predictions_are_written_one_based() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        write_predictions(&path, &[0, 4, 7]);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1\n5\n8\n");
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            "input_path=genome.fasta\niterations=10\ntop_k=100\ninit=random\n"
        )
        .unwrap();

        let config = Config::from_config_file(path);
        assert_eq!(config.input_path(), &PathBuf::from("genome.fasta"));
        assert_eq!(config.iterations(), 10);
        assert_eq!(config.top_k(), 100);
        assert!(config.random_init());
        // untouched defaults
        assert_eq!(config.alphabet(), "xyzn");
        assert_eq!(config.nstates(), 2);
        assert!(config.model_path().is_none());
    }

    #[test]
    fn default_matrices_are_row_stochastic() {
        assert!(Hmm::new(default_transition(), default_emission()).is_ok());
    }

    #[test]
    fn matrix_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A");
        let mut file = File::create(&path).unwrap();
        write!(file, "0.9,0.1\n0.1,0.9\n").unwrap();
        assert_eq!(read_matrix(&path, 2, 2), default_transition());
    }
}

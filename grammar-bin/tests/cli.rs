use grammar_bin::cli::{Cli, EngineArg};
use std::path::PathBuf;

fn cli(infile: PathBuf, outfile: PathBuf, engine: EngineArg) -> Cli {
    Cli {
        production_cost: None,
        profit_ratio_power: None,
        ram_cap_mb: None,
        disable_word_mode: false,
        engine,
        infile,
        outfile,
    }
}

#[test]
fn pair_engine_round_trips_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("in.txt");
    let outfile = dir.path().join("out.bin");
    std::fs::write(&infile, b"\x00banana banana banana").unwrap(); // leading format-flag byte

    grammar_bin::run(cli(infile, outfile.clone(), EngineArg::Pair)).unwrap();
    assert!(std::fs::metadata(&outfile).unwrap().len() > 0);
}

#[test]
fn longest_engine_round_trips_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("in.txt");
    let outfile = dir.path().join("out.bin");
    let mut data = vec![0u8];
    data.extend_from_slice("the cat sat. the cat sat. the cat sat.".as_bytes());
    std::fs::write(&infile, &data).unwrap();

    grammar_bin::run(cli(infile, outfile.clone(), EngineArg::Longest)).unwrap();
    assert!(std::fs::metadata(&outfile).unwrap().len() > 0);
}

#[test]
fn ram_cap_below_minimum_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("in.txt");
    let outfile = dir.path().join("out.bin");
    std::fs::write(&infile, b"\x00hi").unwrap();

    let mut c = cli(infile, outfile, EngineArg::Pair);
    c.ram_cap_mb = Some(10.0);
    assert!(grammar_bin::run(c).is_err());
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("does-not-exist.txt");
    let outfile = dir.path().join("out.bin");
    assert!(grammar_bin::run(cli(infile, outfile, EngineArg::Pair)).is_err());
}

use aspcap_grid::app::pipeline::{load_geometry, run_conversion, run_repeat};
use aspcap_grid::domain::{ConvertConfig, Direction, PixelSpace, RepeatConfig, Telescope};
use aspcap_grid::io::{read_spectrum_table, write_spectrum_table};
use aspcap_grid::registry::{element_index, parameter_index};

#[test]
fn apstar_table_converts_to_chip_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = load_geometry(None).unwrap();

    let wave = geometry.wavelengths(PixelSpace::ApStar);
    let flux: Vec<f64> = wave.iter().map(|w| 1.0 - 1e-5 * (w - 16000.0)).collect();
    let mask: Vec<f64> = (0..wave.len()).map(|i| (i % 7) as f64).collect();
    let input = dir.path().join("apstar.csv");
    write_spectrum_table(
        &input,
        &wave,
        &["FLUX".to_string(), "MASK".to_string()],
        &[flux.clone(), mask],
    )
    .unwrap();

    let chip = dir.path().join("chip.csv");
    let run = run_conversion(
        &ConvertConfig {
            input,
            output: chip.clone(),
            direction: Direction::ToChip,
        },
        &geometry,
    )
    .unwrap();
    assert_eq!(run.rows_out, 7514);
    assert_eq!(run.wave_matched, Some(true));

    let table = read_spectrum_table(&chip).unwrap();
    assert_eq!(table.names, vec!["FLUX", "MASK"]);
    assert_eq!(table.wave.as_deref().map(<[f64]>::len), Some(7514));
    // First green-chip sample is apStar pixel 3585.
    assert_eq!(table.columns[0][3028], flux[3585]);

    let apstar = dir.path().join("apstar_again.csv");
    run_conversion(
        &ConvertConfig {
            input: chip,
            output: apstar.clone(),
            direction: Direction::ToApStar,
        },
        &geometry,
    )
    .unwrap();
    let table = read_spectrum_table(&apstar).unwrap();
    assert_eq!(table.columns[0][3585], flux[3585]);
    assert_eq!(table.columns[0][3300], 0.0);
    assert_eq!(table.columns[1][0], 0.0);
}

#[test]
fn repeat_statistics_split_by_telescope() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("allstar.csv");
    std::fs::write(
        &input,
        "APOGEE_ID,FIELD,TEFF,LOGG,Mg,TiII\n\
         2M01,M67_apo25m,4500,2.50,0.10,0.05\n\
         2M01,M67_lco25m,4540,2.60,0.14,\n\
         2M02,N188,5000,4.40,-0.02,0.00\n\
         2M02,N188_apo1m,5010,4.40,0.00,0.02\n\
         2M03,M67_apo25m,4800,3.00,0.00,0.00\n",
    )
    .unwrap();

    let run = run_repeat(&RepeatConfig {
        input,
        export_json: None,
    })
    .unwrap();
    let summary = &run.summary;
    assert_eq!(summary.n_stars, 3);
    assert_eq!(summary.n_repeat_stars, 2);
    assert_eq!(summary.n_repeat_observations, 4);

    assert_eq!(parameter_index("TEFF"), Some(0));
    let teff = &summary.quantities[0];
    assert_eq!(teff.quantity.name, "TEFF");
    assert_eq!(teff.all.n, 4);
    assert!(teff.all.mean.abs() < 1e-9);
    // Deviations: -20, +20, -5, +5.
    assert!((teff.all.rms - (425f64 / 2.0).sqrt()).abs() < 1e-9);
    assert_eq!(teff.by_telescope[&Telescope::Lco25m].n, 1);
    assert_eq!(teff.by_telescope[&Telescope::Apo1m].n, 1);

    // The second TiII value of 2M01 is missing, so only three deviations count.
    let tiii = summary
        .quantities
        .iter()
        .find(|q| q.quantity.name == "TiII")
        .unwrap();
    assert!(element_index("TiII").is_some());
    assert_eq!(tiii.all.n, 3);
}

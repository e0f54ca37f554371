use approx::assert_relative_eq;
use meltplate::io::{write_fits, write_summaries};
use meltplate::nparc::*;
use meltplate::plate::{temperature_grid, PlateMap, PlateMatrix, WellAnnotation, WellId, N_WELLS};
use ndarray::Array2;

fn dose_response_plate() -> (PlateMatrix, PlateMap) {
    let concentrations = [0.1, 1.0, 10.0, 100.0];
    let platemap = PlateMap::from_entries((0..8).map(|i| {
        (
            WellId::from_index(i).unwrap(),
            WellAnnotation {
                condition: Some("Ligand".into()),
                concentration: Some(concentrations[i / 2]),
            },
        )
    }));
    let temperatures = temperature_grid(6, 45.0, 65.0);
    let values = Array2::from_shape_fn((temperatures.len(), N_WELLS), |(t, w)| {
        let tm = if w < 8 { 52.0 + 2.0 * concentrations[w / 2].log10() } else { 52.0 };
        Some(1.0 / (1.0 + ((temperatures[t] - tm) / 1.5).exp()))
    });
    (PlateMatrix::from_values(temperatures, values).unwrap(), platemap)
}

#[test]
fn tables_have_one_row_per_record() {
    let (matrix, platemap) = dose_response_plate();
    let result = run_nparc(&matrix, &platemap, ValueType::Raw, &NparcOptions::default()).unwrap();
    assert_eq!(result.fits.len(), 6);

    let mut fits = Vec::new();
    write_fits(&mut fits, &result.fits).unwrap();
    let fits = String::from_utf8(fits).unwrap();
    let lines: Vec<&str> = fits.lines().collect();
    assert_eq!(lines[0], "condition,temperature,rss_null,rss_alt,n_points,value_type");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("Ligand,45.0,"));
    assert!(lines[1].ends_with(",8,Raw"));

    let mut summaries = Vec::new();
    write_summaries(&mut summaries, &correct(result.summaries.clone())).unwrap();
    let summaries = String::from_utf8(summaries).unwrap();
    assert_eq!(summaries.lines().count(), 2);
    assert!(summaries.lines().nth(1).unwrap().starts_with("Ligand,6,"));
}

#[test]
fn json_round_trip() {
    let (matrix, platemap) = dose_response_plate();
    let result = run_nparc(&matrix, &platemap, ValueType::BaselineCorrected, &NparcOptions::default())
        .unwrap();
    let json = result.to_json().unwrap();
    let parsed: NparcResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.fits.len(), result.fits.len());
    for (a, b) in parsed.fits.iter().zip(&result.fits) {
        assert_eq!(a.value_type, ValueType::BaselineCorrected);
        assert_relative_eq!(a.rss_alt, b.rss_alt, max_relative = 1e-12);
        assert_relative_eq!(a.rss_null, b.rss_null, max_relative = 1e-12);
    }
    let summary = &parsed.summaries[0];
    assert_eq!(summary.condition, "Ligand");
    assert_eq!(summary.p_adj_bh, None);
}

use approx::assert_relative_eq;
use meltplate::nparc::{benjamini_hochberg, correct, ConditionSummary, ValueType};

fn summary(condition: &str, p_value: Option<f64>, value_type: ValueType) -> ConditionSummary {
    ConditionSummary {
        condition: condition.to_string(),
        n_temperatures: 6,
        u_stat: p_value.map(|_| 3.0),
        p_value,
        median_rss_null: 1.0,
        median_rss_alt: 0.5,
        frac_alt_better: 0.5,
        value_type,
        p_adj_bh: None,
    }
}

#[test]
fn adjusted_values_are_monotone_and_bounded() {
    let p = [Some(0.01), Some(0.02), Some(0.03), Some(0.5)];
    let q: Vec<f64> = benjamini_hochberg(&p).into_iter().map(Option::unwrap).collect();

    for window in q.windows(2) {
        assert!(window[0] <= window[1]);
    }
    for (adjusted, raw) in q.iter().zip(p.iter().flatten()) {
        assert!(adjusted >= raw);
        assert!(*adjusted <= 1.0);
    }
    assert_relative_eq!(q[0], 0.04, epsilon = 1e-12);
    assert_relative_eq!(q[3], 0.5, epsilon = 1e-12);
}

#[test]
fn unsorted_input_keeps_positions() {
    let q = benjamini_hochberg(&[Some(0.5), None, Some(0.01), Some(0.03)]);
    assert_eq!(q[1], None);
    assert_relative_eq!(q[0].unwrap(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(q[2].unwrap(), 0.03, epsilon = 1e-12);
    assert_relative_eq!(q[3].unwrap(), 0.045, epsilon = 1e-12);
}

#[test]
fn value_types_form_separate_families() {
    let corrected = correct(vec![
        summary("A", Some(0.01), ValueType::BaselineCorrected),
        summary("A", Some(0.01), ValueType::Raw),
        summary("B", Some(0.04), ValueType::BaselineCorrected),
        summary("B", None, ValueType::Raw),
    ]);

    let names: Vec<(&str, ValueType)> = corrected
        .iter()
        .map(|s| (s.condition.as_str(), s.value_type))
        .collect();
    assert_eq!(
        names,
        vec![
            ("A", ValueType::BaselineCorrected),
            ("A", ValueType::Raw),
            ("B", ValueType::BaselineCorrected),
            ("B", ValueType::Raw),
        ]
    );
    assert_relative_eq!(corrected[0].p_adj_bh.unwrap(), 0.02, epsilon = 1e-12);
    assert_relative_eq!(corrected[1].p_adj_bh.unwrap(), 0.01, epsilon = 1e-12);
    assert_relative_eq!(corrected[2].p_adj_bh.unwrap(), 0.04, epsilon = 1e-12);
    assert_eq!(corrected[3].p_adj_bh, None);
}

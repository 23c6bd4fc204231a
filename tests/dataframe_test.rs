#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ratrs::{DataFrame, MeltOptions, Series};

    fn wide_rating_frame() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "Subject".to_string(),
            Series::from_strings(&["1", "2", "3", "4"], Some("Subject".to_string())).unwrap(),
        )
        .unwrap();
        df.add_column(
            "Rater1".to_string(),
            Series::from_strings(&["3.4", "5.1", "2.8", "6.2"], Some("Rater1".to_string()))
                .unwrap(),
        )
        .unwrap();
        df.add_column(
            "Rater2".to_string(),
            Series::from_strings(&["3.6", "5.3", "2.9", "6.0"], Some("Rater2".to_string()))
                .unwrap(),
        )
        .unwrap();
        df.add_column(
            "Rater3".to_string(),
            Series::from_strings(&["3.5", "5.0", "3.1", "6.1"], Some("Rater3".to_string()))
                .unwrap(),
        )
        .unwrap();
        df
    }

    #[test]
    fn test_frame_construction() {
        let df = wide_rating_frame();
        assert_eq!(df.row_count(), 4);
        assert_eq!(df.column_count(), 4);
        assert_eq!(
            df.column_names(),
            vec!["Subject", "Rater1", "Rater2", "Rater3"]
        );

        let scores = df.numeric_values("Rater2").unwrap();
        assert_eq!(scores, vec![Some(3.6), Some(5.3), Some(2.9), Some(6.0)]);
    }

    #[test]
    fn test_melt_preserves_every_triple_exactly_once() {
        let df = wide_rating_frame();
        let options = MeltOptions {
            id_vars: Some(vec!["Subject".to_string()]),
            value_vars: Some(vec![
                "Rater1".to_string(),
                "Rater2".to_string(),
                "Rater3".to_string(),
            ]),
            var_name: Some("rater".to_string()),
            value_name: Some("score".to_string()),
        };
        let melted = df.melt(&options).unwrap();

        assert_eq!(melted.row_count(), 12);
        assert_eq!(melted.column_names(), vec!["Subject", "rater", "score"]);

        // 元のワイド形式の全ての (対象, 評価者, 評定) の組が正確に1回ずつ現れる
        let subjects = melted.column_values("Subject").unwrap();
        let raters = melted.column_values("rater").unwrap();
        let scores = melted.column_values("score").unwrap();

        let mut seen = HashSet::new();
        for row in 0..melted.row_count() {
            let triple = (
                subjects[row].clone(),
                raters[row].clone(),
                scores[row].clone(),
            );
            assert!(seen.insert(triple), "重複した行があります");
        }

        for (subject_pos, subject) in ["1", "2", "3", "4"].iter().enumerate() {
            for rater in ["Rater1", "Rater2", "Rater3"] {
                let expected_score = df.column_values(rater).unwrap()[subject_pos].clone();
                assert!(seen.contains(&(
                    subject.to_string(),
                    rater.to_string(),
                    expected_score
                )));
            }
        }
    }

    #[test]
    fn test_melt_without_id_vars_uses_remaining_columns() {
        let mut df = DataFrame::new();
        df.add_column(
            "A".to_string(),
            Series::from_strings(&["1", "2"], Some("A".to_string())).unwrap(),
        )
        .unwrap();
        df.add_column(
            "B".to_string(),
            Series::from_strings(&["3", "4"], Some("B".to_string())).unwrap(),
        )
        .unwrap();

        let melted = df.melt(&MeltOptions::default()).unwrap();
        assert_eq!(melted.row_count(), 4);
        assert_eq!(melted.column_names(), vec!["variable", "value"]);
    }
}

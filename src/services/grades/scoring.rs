//! 成绩计算的纯函数部分

use std::collections::BTreeMap;

use crate::config::{GradeBand, GradingConfig};
use crate::models::grades::{
    entities::Grade,
    responses::{GradeStats, LetterCount},
};

/// 截尾平均：不少于 3 个值时去掉一个最高值和一个最低值
///
/// 返回 (平均值, 参与平均的数量)；没有投资时为 (0.0, 0)。
pub fn trimmed_mean(values: &[i32]) -> (f64, i32) {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let used = if sorted.len() >= 3 {
        &sorted[1..sorted.len() - 1]
    } else {
        &sorted[..]
    };

    if used.is_empty() {
        return (0.0, 0);
    }

    let sum: i64 = used.iter().map(|&v| i64::from(v)).sum();
    (sum as f64 / used.len() as f64, used.len() as i32)
}

/// 平均投资额落入的分档（按 min_average 从高到低取第一个达到的档）
pub fn band_for(config: &GradingConfig, average: f64) -> Option<&GradeBand> {
    let mut bands: Vec<&GradeBand> = config.bands.iter().collect();
    bands.sort_by(|a, b| b.min_average.total_cmp(&a.min_average));

    bands
        .iter()
        .find(|band| average >= band.min_average)
        .or_else(|| bands.last())
        .copied()
}

/// 按等级字母查找分档，人工覆盖的等级同样适用
pub fn band_for_letter<'a>(config: &'a GradingConfig, letter: &str) -> Option<&'a GradeBand> {
    config.bands.iter().find(|band| band.letter == letter)
}

/// 作业成绩统计
pub fn grade_stats(grades: &[Grade]) -> GradeStats {
    let mut percentages: Vec<f64> = grades.iter().map(|g| g.percentage).collect();
    percentages.sort_by(f64::total_cmp);

    let count = percentages.len();
    let mean_percentage = (count > 0).then(|| percentages.iter().sum::<f64>() / count as f64);
    let median_percentage = (count > 0).then(|| {
        if count % 2 == 1 {
            percentages[count / 2]
        } else {
            (percentages[count / 2 - 1] + percentages[count / 2]) / 2.0
        }
    });

    let mut letters: BTreeMap<&str, i64> = BTreeMap::new();
    for grade in grades {
        *letters.entry(grade.letter_grade.as_str()).or_default() += 1;
    }

    GradeStats {
        count: count as i64,
        mean_percentage,
        median_percentage,
        distribution: letters
            .into_iter()
            .map(|(letter, count)| LetterCount {
                letter_grade: letter.to_string(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_mean_drops_extremes() {
        assert_eq!(trimmed_mean(&[10, 20, 30]), (20.0, 1));
        assert_eq!(trimmed_mean(&[30, 10, 20]), (20.0, 1));
        assert_eq!(trimmed_mean(&[0, 50, 10, 20, 30]), (20.0, 3));
    }

    #[test]
    fn test_trimmed_mean_small_sets() {
        assert_eq!(trimmed_mean(&[10, 20]), (15.0, 2));
        assert_eq!(trimmed_mean(&[7]), (7.0, 1));
        assert_eq!(trimmed_mean(&[]), (0.0, 0));
    }

    #[test]
    fn test_band_lookup() {
        let config = GradingConfig::default();
        assert_eq!(band_for(&config, 30.0).unwrap().letter, "A");
        assert_eq!(band_for(&config, 29.9).unwrap().letter, "B");
        assert_eq!(band_for(&config, 15.0).unwrap().letter, "C");
        assert_eq!(band_for(&config, 0.0).unwrap().letter, "D");
        assert_eq!(band_for(&config, 20.0).unwrap().tier, "median");
    }

    #[test]
    fn test_band_lookup_ignores_declaration_order() {
        let mut config = GradingConfig::default();
        config.bands.reverse();
        assert_eq!(band_for(&config, 22.0).unwrap().letter, "B");
        assert_eq!(band_for_letter(&config, "A").unwrap().tier, "high");
        assert!(band_for_letter(&config, "F").is_none());
    }
}

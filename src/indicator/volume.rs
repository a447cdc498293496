use crate::indicator::IndicatorSeries;
use crate::indicator::utils;
use crate::model::Candle;

/// 바별 거래량 변화율 시리즈 계산
///
/// 각 바에서 직전 바 대비 거래량 변화 백분율을 계산합니다.
/// 첫 바(비교 대상 없음)와 직전 거래량이 0인 바는 부재(None)입니다.
///
/// # Arguments
/// * `data` - 시간 오름차순 캔들 시퀀스
///
/// # Returns
/// * `IndicatorSeries` - 입력 바당 한 항목의 변화율(%) 시리즈
pub fn volume_change_series<C: Candle>(data: &[C]) -> IndicatorSeries {
    let timestamps: Vec<i64> = data.iter().map(|c| c.timestamp_ms()).collect();
    let mut values: Vec<Option<f64>> = Vec::with_capacity(data.len());

    for i in 0..data.len() {
        if i == 0 {
            values.push(None);
            continue;
        }

        let previous = data[i - 1].volume();
        if previous == 0.0 {
            values.push(None);
            continue;
        }

        let current = data[i].volume();
        values.push(Some((current - previous) / previous * 100.0));
    }

    IndicatorSeries::new(timestamps, values)
}

/// 후행 윈도우 평균 거래량 계산
///
/// 마지막 `period`개 바의 단순 평균 거래량입니다. 데이터가 `period`보다
/// 적으면 None을 반환합니다.
///
/// # Arguments
/// * `data` - 시간 오름차순 캔들 시퀀스
/// * `period` - 평균 계산 기간
///
/// # Returns
/// * `Option<f64>` - 평균 거래량 또는 None
///
/// # Panics
/// * `period`가 0이면 패닉 발생
pub fn average_volume<C: Candle>(data: &[C], period: usize) -> Option<f64> {
    if period == 0 {
        panic!("평균 거래량 기간은 0보다 커야 합니다");
    }

    if data.len() < period {
        return None;
    }

    let volumes: Vec<f64> = data[data.len() - period..]
        .iter()
        .map(|c| c.volume())
        .collect();
    Some(utils::mean(&volumes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bar;

    fn bar(timestamp: i64, volume: f64) -> Bar {
        Bar::new(timestamp, 10.0, 11.0, 9.0, 10.0, volume)
    }

    #[test]
    fn test_volume_change_first_bar_absent() {
        let data = vec![bar(1000, 100.0), bar(2000, 150.0), bar(3000, 75.0)];
        let series = volume_change_series(&data);

        assert_eq!(series.len(), 3);
        assert_eq!(series.value(0), None);
        assert_eq!(series.value(1), Some(50.0));
        assert_eq!(series.value(2), Some(-50.0));
    }

    #[test]
    fn test_volume_change_flat_is_zero() {
        let data = vec![bar(1000, 100.0), bar(2000, 100.0)];
        let series = volume_change_series(&data);
        assert_eq!(series.value(1), Some(0.0));
    }

    #[test]
    fn test_volume_change_zero_previous_absent() {
        // 직전 거래량이 0이면 0으로 나누지 않고 부재 처리
        let data = vec![bar(1000, 0.0), bar(2000, 100.0)];
        let series = volume_change_series(&data);
        assert_eq!(series.value(1), None);
    }

    #[test]
    fn test_average_volume() {
        let data = vec![bar(1000, 100.0), bar(2000, 200.0), bar(3000, 300.0)];
        assert_eq!(average_volume(&data, 2), Some(250.0));
        assert_eq!(average_volume(&data, 3), Some(200.0));
        assert_eq!(average_volume(&data, 4), None);
    }

    #[test]
    #[should_panic(expected = "평균 거래량 기간은 0보다 커야 합니다")]
    fn test_average_volume_invalid_period() {
        average_volume(&Vec::<Bar>::new(), 0);
    }
}

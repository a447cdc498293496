use crate::error::{IndicatorError, IndicatorResult};
use crate::indicator::IndicatorSeries;
use crate::model::Candle;
use std::fmt::Display;

/// OBV(On-Balance Volume) 시리즈 계산 함수
///
/// `obv[0] = 0`에서 시작하여, 종가가 전일보다 오르면 거래량을 더하고
/// 내리면 빼며 같으면 그대로 유지합니다. EMA/RSI와 달리 최소 기간
/// 요구가 없어 모든 항목이 항상 존재합니다.
///
/// # Arguments
/// * `closes` - 종가 시퀀스
/// * `volumes` - 거래량 시퀀스 (종가와 같은 길이)
///
/// # Returns
/// * `IndicatorResult<Vec<f64>>` - 입력과 같은 길이의 OBV 시리즈
///
/// # Errors
/// * 두 시퀀스의 길이가 다르면 `LengthMismatch` 반환 (절대 잘라내지 않음)
pub fn obv_series(closes: &[f64], volumes: &[f64]) -> IndicatorResult<Vec<f64>> {
    if closes.len() != volumes.len() {
        return Err(IndicatorError::LengthMismatch {
            left: closes.len(),
            right: volumes.len(),
        });
    }

    if closes.is_empty() {
        return Ok(Vec::new());
    }

    let mut obv = Vec::with_capacity(closes.len());
    obv.push(0.0);

    for i in 1..closes.len() {
        let previous = obv[i - 1];
        let next = if closes[i] > closes[i - 1] {
            previous + volumes[i]
        } else if closes[i] < closes[i - 1] {
            previous - volumes[i]
        } else {
            // 가격 변동 없음: 그대로 유지
            previous
        };
        obv.push(next);
    }

    Ok(obv)
}

/// OBV 계산 빌더
///
/// 누적 거래량 흐름 지표인 OBV를 캔들 시퀀스에서 계산합니다.
#[derive(Debug, Clone, Default)]
pub struct ObvBuilder;

impl Display for ObvBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OBV")
    }
}

impl ObvBuilder {
    /// 새 OBV 빌더 생성
    pub fn new() -> Self {
        ObvBuilder
    }

    /// 종가/거래량 시퀀스에서 OBV 시리즈 계산
    pub fn compute(&self, closes: &[f64], volumes: &[f64]) -> IndicatorResult<Vec<f64>> {
        obv_series(closes, volumes)
    }

    /// 캔들 시퀀스에서 타임스탬프가 정렬된 OBV 시리즈 계산
    ///
    /// OBV는 워밍업 구간이 없으므로 모든 항목이 존재합니다.
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<IndicatorSeries>` - 입력 바당 한 항목의 OBV 시리즈
    pub fn compute_candles<C: Candle>(&self, data: &[C]) -> IndicatorResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        let volumes: Vec<f64> = data.iter().map(|c| c.volume()).collect();
        let timestamps: Vec<i64> = data.iter().map(|c| c.timestamp_ms()).collect();

        let values = obv_series(&closes, &volumes)?
            .into_iter()
            .map(Some)
            .collect();

        Ok(IndicatorSeries::new(timestamps, values))
    }
}

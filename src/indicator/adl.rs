use crate::indicator::IndicatorSeries;
use crate::model::Candle;
use std::fmt::Display;

/// 매집/분산 라인(ADL) 계산 결과
///
/// 종가 위치값(CLV), 자금 흐름 거래량(MFV), 누적 ADL의 세 시리즈를
/// 모두 노출합니다. CLV와 MFV는 범위가 0인 바(high == low)에서
/// 부재(None)이며, ADL은 부재 구간에서 직전 누적값을 그대로 이어갑니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AdlOutput {
    /// 종가 위치값 (-1 ~ +1, 범위 0 바에서는 부재)
    pub clv: Vec<Option<f64>>,
    /// 자금 흐름 거래량 (CLV * 거래량, 부재 전파)
    pub mfv: Vec<Option<f64>>,
    /// 누적 매집/분산 라인 (항상 존재)
    pub adl: Vec<f64>,
}

impl Display for AdlOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADL(len={})", self.adl.len())
    }
}

/// 매집/분산 라인(ADL) 시리즈 계산 함수
///
/// 바별 종가 위치값:
/// `clv = ((close - low) - (high - close)) / (high - low)`
///
/// high == low인 바에서는 CLV가 정의되지 않으므로 0으로 대체하지 않고
/// 부재로 처리합니다. ADL은 MFV의 누적 합이며, 부재 MFV 구간에서는
/// 직전 누적값을 이어가고(0 증가분으로 취급하는 것이 아니라 전방 채움),
/// 선행 부재 구간은 0에서 시작합니다.
///
/// # Arguments
/// * `data` - 시간 오름차순 캔들 시퀀스
///
/// # Returns
/// * `AdlOutput` - 입력과 같은 길이의 CLV/MFV/ADL 시리즈
pub fn adl_series<C: Candle>(data: &[C]) -> AdlOutput {
    let n = data.len();
    let mut clv: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut mfv: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut adl: Vec<f64> = Vec::with_capacity(n);

    let mut total = 0.0;
    for candle in data {
        let high = candle.high_price();
        let low = candle.low_price();
        let close = candle.close_price();
        let range = high - low;

        let bar_clv = if range == 0.0 {
            // 범위 0 바: 0으로 나누지 않고 부재 처리
            None
        } else {
            Some(((close - low) - (high - close)) / range)
        };

        let bar_mfv = bar_clv.map(|v| v * candle.volume());
        if let Some(value) = bar_mfv {
            total += value;
        }

        clv.push(bar_clv);
        mfv.push(bar_mfv);
        adl.push(total);
    }

    AdlOutput { clv, mfv, adl }
}

/// ADL 계산 빌더
#[derive(Debug, Clone, Default)]
pub struct AdlBuilder;

impl Display for AdlBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADL")
    }
}

impl AdlBuilder {
    /// 새 ADL 빌더 생성
    pub fn new() -> Self {
        AdlBuilder
    }

    /// 캔들 시퀀스에서 CLV/MFV/ADL 시리즈 계산
    pub fn compute<C: Candle>(&self, data: &[C]) -> AdlOutput {
        adl_series(data)
    }

    /// 캔들 시퀀스에서 타임스탬프가 정렬된 ADL 시리즈 계산
    ///
    /// ADL 자체는 항상 존재하는 누적 시리즈입니다.
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorSeries` - 입력 바당 한 항목의 ADL 시리즈
    pub fn compute_candles<C: Candle>(&self, data: &[C]) -> IndicatorSeries {
        let timestamps: Vec<i64> = data.iter().map(|c| c.timestamp_ms()).collect();
        let values = adl_series(data).adl.into_iter().map(Some).collect();
        IndicatorSeries::new(timestamps, values)
    }
}

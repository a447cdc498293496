use crate::error::{IndicatorError, IndicatorResult};
use crate::indicator::utils;
use crate::indicator::{IndicatorSeries, InsufficientDataPolicy};
use crate::model::Candle;
use std::fmt::Display;

/// EMA 시리즈 계산 함수
///
/// 첫 값은 처음 `period`개 값의 단순이동평균(SMA 시드)이며, 관례적인
/// "첫 값 시드"가 아닙니다. 이후는 점화식
/// `ema[i] = (values[i] - ema[i-1]) * alpha + ema[i-1]` (alpha = 2/(period+1))
/// 을 따릅니다. 인덱스 `period-1` 이전 구간은 부재(None)입니다.
///
/// # Arguments
/// * `values` - 값 시퀀스
/// * `period` - EMA 계산 기간
/// * `policy` - 데이터 부족 시 정책
///
/// # Returns
/// * `IndicatorResult<Vec<Option<f64>>>` - 입력과 같은 길이의 EMA 시리즈
///
/// # Panics
/// * `period`가 0이면 패닉 발생
pub fn ema_series(
    values: &[f64],
    period: usize,
    policy: InsufficientDataPolicy,
) -> IndicatorResult<Vec<Option<f64>>> {
    if period == 0 {
        panic!("EMA 기간은 0보다 커야 합니다");
    }

    let n = values.len();
    if n < period {
        return match policy {
            InsufficientDataPolicy::AllAbsent => Ok(vec![None; n]),
            InsufficientDataPolicy::Fail => Err(IndicatorError::InsufficientData {
                required: period,
                actual: n,
            }),
        };
    }

    let alpha = utils::ema_alpha(period);
    let mut series: Vec<Option<f64>> = vec![None; period - 1];

    // SMA 시드: 인덱스 period-1에서 첫 EMA
    let mut previous = utils::mean(&values[..period]);
    series.push(Some(previous));

    for &value in &values[period..] {
        previous = utils::ema_step(value, previous, alpha);
        series.push(Some(previous));
    }

    Ok(series)
}

/// SMA 시리즈 계산 함수
///
/// 각 인덱스에서 직전 `period`개 값의 단순 평균입니다. 워밍업 구간은
/// EMA와 동일하게 부재(None)로 표시됩니다.
///
/// # Arguments
/// * `values` - 값 시퀀스
/// * `period` - SMA 계산 기간
/// * `policy` - 데이터 부족 시 정책
///
/// # Returns
/// * `IndicatorResult<Vec<Option<f64>>>` - 입력과 같은 길이의 SMA 시리즈
///
/// # Panics
/// * `period`가 0이면 패닉 발생
pub fn sma_series(
    values: &[f64],
    period: usize,
    policy: InsufficientDataPolicy,
) -> IndicatorResult<Vec<Option<f64>>> {
    if period == 0 {
        panic!("SMA 기간은 0보다 커야 합니다");
    }

    let n = values.len();
    if n < period {
        return match policy {
            InsufficientDataPolicy::AllAbsent => Ok(vec![None; n]),
            InsufficientDataPolicy::Fail => Err(IndicatorError::InsufficientData {
                required: period,
                actual: n,
            }),
        };
    }

    let mut series: Vec<Option<f64>> = vec![None; period - 1];
    for i in period - 1..n {
        series.push(Some(utils::mean(&values[i + 1 - period..=i])));
    }

    Ok(series)
}

/// 지수이동평균(EMA) 계산 빌더
///
/// 지수이동평균은 최근 데이터에 더 높은 가중치를 부여하는 이동평균입니다.
#[derive(Debug, Clone)]
pub struct EmaBuilder {
    /// EMA 계산 기간
    period: usize,
    /// 데이터 부족 시 정책
    policy: InsufficientDataPolicy,
}

impl Display for EmaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.period)
    }
}

impl EmaBuilder {
    /// 새 EMA 빌더 생성
    ///
    /// # Arguments
    /// * `period` - EMA 계산 기간
    ///
    /// # Returns
    /// * `EmaBuilder` - 새 빌더 인스턴스
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("EMA 기간은 0보다 커야 합니다");
        }

        EmaBuilder {
            period,
            policy: InsufficientDataPolicy::default(),
        }
    }

    /// 데이터 부족 정책 설정
    pub fn with_policy(mut self, policy: InsufficientDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// EMA 기간 반환
    pub fn period(&self) -> usize {
        self.period
    }

    /// 값 시퀀스에서 EMA 시리즈 계산
    ///
    /// # Arguments
    /// * `values` - 값 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<Vec<Option<f64>>>` - EMA 시리즈
    pub fn compute(&self, values: &[f64]) -> IndicatorResult<Vec<Option<f64>>> {
        ema_series(values, self.period, self.policy)
    }

    /// 캔들 종가에서 타임스탬프가 정렬된 EMA 시리즈 계산
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<IndicatorSeries>` - 입력 바당 한 항목의 EMA 시리즈
    pub fn compute_candles<C: Candle>(&self, data: &[C]) -> IndicatorResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        let timestamps: Vec<i64> = data.iter().map(|c| c.timestamp_ms()).collect();
        let values = self.compute(&closes)?;
        Ok(IndicatorSeries::new(timestamps, values))
    }
}

use crate::error::{IndicatorError, IndicatorResult};
use crate::indicator::{IndicatorSeries, InsufficientDataPolicy};
use crate::model::Candle;
use std::fmt::Display;

/// 평균 이득/손실로부터 RSI 값 계산
///
/// 평균 손실이 0이면 RS를 +무한대로 취급하여 RSI = 100을 반환합니다.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Wilder RSI 시리즈 계산 함수
///
/// 값을 하나라도 만들려면 최소 `period + 1`개의 종가가 필요합니다.
/// 시드는 처음 `period`개 이득/손실 쌍의 단순 평균이고, 이후는
/// Wilder 평활화 `avg = (avg * (period-1) + x) / period`를 따릅니다.
/// 첫 유효 인덱스(`period`) 이전 구간은 부재(None)이며 0이 아닙니다.
///
/// # Arguments
/// * `closes` - 종가 시퀀스
/// * `period` - RSI 계산 기간 (일반적으로 14)
/// * `policy` - 데이터 부족 시 정책
///
/// # Returns
/// * `IndicatorResult<Vec<Option<f64>>>` - 입력과 같은 길이의 RSI 시리즈
///
/// # Panics
/// * `period`가 0이면 패닉 발생
pub fn rsi_series(
    closes: &[f64],
    period: usize,
    policy: InsufficientDataPolicy,
) -> IndicatorResult<Vec<Option<f64>>> {
    if period == 0 {
        panic!("RSI 기간은 0보다 커야 합니다");
    }

    let n = closes.len();
    if n < period + 1 {
        return match policy {
            InsufficientDataPolicy::AllAbsent => Ok(vec![None; n]),
            InsufficientDataPolicy::Fail => Err(IndicatorError::InsufficientData {
                required: period + 1,
                actual: n,
            }),
        };
    }

    // 바별 이득/손실 (손실은 양수 크기로 저장)
    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // 시드: 처음 period개 쌍의 단순 평균
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut series: Vec<Option<f64>> = vec![None; period];
    series.push(Some(rsi_from_averages(avg_gain, avg_loss)));

    // Wilder 평활화로 갱신
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        series.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    Ok(series)
}

/// 상대강도지수(RSI) 계산 빌더
///
/// RSI는 가격 변동의 상대적 강도를 측정하여 과매수/과매도 상태를
/// 판단하는 0-100 범위의 오실레이터입니다.
#[derive(Debug, Clone)]
pub struct RsiBuilder {
    /// RSI 계산 기간
    period: usize,
    /// 데이터 부족 시 정책
    policy: InsufficientDataPolicy,
}

impl Display for RsiBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.period)
    }
}

impl RsiBuilder {
    /// 새 RSI 빌더 생성
    ///
    /// # Arguments
    /// * `period` - RSI 계산 기간 (일반적으로 14)
    ///
    /// # Returns
    /// * `RsiBuilder` - 새 빌더 인스턴스
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("RSI 기간은 0보다 커야 합니다");
        }

        RsiBuilder {
            period,
            policy: InsufficientDataPolicy::default(),
        }
    }

    /// 데이터 부족 정책 설정
    pub fn with_policy(mut self, policy: InsufficientDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// RSI 기간 반환
    pub fn period(&self) -> usize {
        self.period
    }

    /// 종가 시퀀스에서 RSI 시리즈 계산
    pub fn compute(&self, closes: &[f64]) -> IndicatorResult<Vec<Option<f64>>> {
        rsi_series(closes, self.period, self.policy)
    }

    /// 캔들 종가에서 타임스탬프가 정렬된 RSI 시리즈 계산
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<IndicatorSeries>` - 입력 바당 한 항목의 RSI 시리즈
    pub fn compute_candles<C: Candle>(&self, data: &[C]) -> IndicatorResult<IndicatorSeries> {
        let closes: Vec<f64> = data.iter().map(|c| c.close_price()).collect();
        let timestamps: Vec<i64> = data.iter().map(|c| c.timestamp_ms()).collect();
        let values = self.compute(&closes)?;
        Ok(IndicatorSeries::new(timestamps, values))
    }
}

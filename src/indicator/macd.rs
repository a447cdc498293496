use crate::error::{IndicatorError, IndicatorResult};
use crate::indicator::ema::ema_series;
use crate::indicator::InsufficientDataPolicy;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// MACD 계산 매개변수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 빠른 EMA 기간 (일반적으로 12)
    pub short_period: usize,
    /// 느린 EMA 기간 (일반적으로 26)
    pub long_period: usize,
    /// 시그널 라인 기간 (일반적으로 9)
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            short_period: 12,
            long_period: 26,
            signal_period: 9,
        }
    }
}

impl Display for MacdParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({},{},{})",
            self.short_period, self.long_period, self.signal_period
        )
    }
}

/// MACD 계산 결과
///
/// 세 시리즈 모두 입력 종가와 같은 길이로 정렬되며, 워밍업 구간은
/// 부재(None)입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    /// MACD 라인 (빠른 EMA - 느린 EMA)
    pub macd: Vec<Option<f64>>,
    /// 시그널 라인 (MACD 라인의 EMA)
    pub signal: Vec<Option<f64>>,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: Vec<Option<f64>>,
}

impl Display for MacdOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MacdOutput(len={})", self.macd.len())
    }
}

/// MACD 시리즈 계산 함수
///
/// MACD 라인은 빠른 EMA와 느린 EMA의 차이이며 두 EMA가 모두 존재하는
/// 인덱스(`long_period - 1`부터)에서 존재합니다. 시그널 라인은 MACD
/// 라인의 존재 구간에 대한 EMA를 바 축에 재정렬한 것이고, 히스토그램은
/// 둘 다 존재하는 인덱스에서의 차이입니다. EMA는 이 크레이트의 통일된
/// SMA 시드 의미론을 사용합니다.
///
/// # Arguments
/// * `closes` - 종가 시퀀스
/// * `params` - MACD 매개변수
/// * `policy` - 데이터 부족 시 정책
///
/// # Returns
/// * `IndicatorResult<MacdOutput>` - 입력과 같은 길이의 MACD 시리즈들
///
/// # Panics
/// * 기간이 0이거나 빠른 기간이 느린 기간 이상이면 패닉 발생
pub fn macd_series(
    closes: &[f64],
    params: &MacdParams,
    policy: InsufficientDataPolicy,
) -> IndicatorResult<MacdOutput> {
    if params.short_period == 0 || params.long_period == 0 || params.signal_period == 0 {
        panic!("MACD 기간은 0보다 커야 합니다");
    }

    if params.short_period >= params.long_period {
        panic!("MACD 빠른 기간은 느린 기간보다 작아야 합니다");
    }

    let n = closes.len();
    if n < params.long_period {
        return match policy {
            InsufficientDataPolicy::AllAbsent => Ok(MacdOutput {
                macd: vec![None; n],
                signal: vec![None; n],
                histogram: vec![None; n],
            }),
            InsufficientDataPolicy::Fail => Err(IndicatorError::InsufficientData {
                required: params.long_period,
                actual: n,
            }),
        };
    }

    // 길이 검사를 통과했으므로 두 EMA 모두 성공
    let short_ema = ema_series(closes, params.short_period, InsufficientDataPolicy::AllAbsent)?;
    let long_ema = ema_series(closes, params.long_period, InsufficientDataPolicy::AllAbsent)?;

    let macd: Vec<Option<f64>> = short_ema
        .iter()
        .zip(long_ema.iter())
        .map(|(s, l)| match (s, l) {
            (Some(s), Some(l)) => Some(s - l),
            _ => None,
        })
        .collect();

    // MACD 라인의 존재 구간은 long_period - 1부터 연속
    let offset = params.long_period - 1;
    let present: Vec<f64> = macd[offset..].iter().map(|v| v.unwrap_or(0.0)).collect();

    let mut signal: Vec<Option<f64>> = vec![None; n];
    if present.len() < params.signal_period {
        if policy == InsufficientDataPolicy::Fail {
            return Err(IndicatorError::InsufficientData {
                required: params.long_period + params.signal_period - 1,
                actual: n,
            });
        }
    } else {
        let inner = ema_series(&present, params.signal_period, InsufficientDataPolicy::AllAbsent)?;
        for (j, value) in inner.into_iter().enumerate() {
            signal[offset + j] = value;
        }
    }

    let histogram: Vec<Option<f64>> = macd
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    Ok(MacdOutput {
        macd,
        signal,
        histogram,
    })
}

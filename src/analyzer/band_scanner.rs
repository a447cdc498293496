use crate::error::{IndicatorError, IndicatorResult};
use crate::indicator::bband::BandPair;
use crate::model::{PriceDirection, SignalEvent, SignalKind, SignalReaction};
use log::debug;
use std::fmt::Display;

/// 기본 스퀴즈 룩백 기간
pub const DEFAULT_SQUEEZE_LOOKBACK: usize = 6;

/// 기본 룩어헤드 바 수
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// 볼린저 밴드 신호 스캐너
///
/// 기준 시리즈(일반적으로 OBV)와 그 볼린저 밴드를 소비하여 과매수 /
/// 과매도 / 스퀴즈 신호 이벤트를 식별하고, 각 신호에 대한 룩어헤드
/// 가격 반응을 평가합니다. 스캔은 순수 계산이며 같은 입력에서 항상
/// 같은 신호를 재생산합니다.
#[derive(Debug, Clone)]
pub struct BandScanner {
    /// 스퀴즈 판정 룩백 기간
    squeeze_lookback: usize,
    /// 가격 반응 룩어헤드 바 수
    lookahead: usize,
}

impl Default for BandScanner {
    fn default() -> Self {
        BandScanner::new(DEFAULT_SQUEEZE_LOOKBACK, DEFAULT_LOOKAHEAD)
    }
}

impl Display for BandScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BandScanner(lookback={}, lookahead={})",
            self.squeeze_lookback, self.lookahead
        )
    }
}

impl BandScanner {
    /// 새 밴드 스캐너 생성
    ///
    /// # Arguments
    /// * `squeeze_lookback` - 스퀴즈 판정에 사용할 후행 밴드 폭 개수
    /// * `lookahead` - 가격 반응 평가에 사용할 미래 바 수
    ///
    /// # Returns
    /// * `BandScanner` - 새 스캐너 인스턴스
    ///
    /// # Panics
    /// * `squeeze_lookback`이 0이면 패닉 발생
    pub fn new(squeeze_lookback: usize, lookahead: usize) -> Self {
        if squeeze_lookback == 0 {
            panic!("스퀴즈 룩백 기간은 0보다 커야 합니다");
        }

        BandScanner {
            squeeze_lookback,
            lookahead,
        }
    }

    /// 스퀴즈 룩백 기간 반환
    pub fn squeeze_lookback(&self) -> usize {
        self.squeeze_lookback
    }

    /// 룩어헤드 바 수 반환
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// 기준 시리즈와 밴드에서 신호 이벤트 스캔
    ///
    /// 분류는 상단/하단 밴드가 모두 존재하는 인덱스에서만 수행합니다.
    /// 과매수(`base > upper`)를 먼저 평가하고, 아니면 과매도
    /// (`base < lower`)를 평가합니다 (둘은 상호 배타적).
    /// 스퀴즈는 `i >= lookback - 1`이고 현재 밴드 폭이 후행 룩백 윈도우
    /// (밴드가 존재하는 인덱스로 제한) 내 최소 폭 이하일 때 결합됩니다.
    /// 동률이어도 스퀴즈로 판정합니다 (비엄격 최소).
    ///
    /// # Arguments
    /// * `base` - 기준 시리즈 (예: OBV)
    /// * `bands` - 기준 시리즈의 볼린저 밴드
    /// * `timestamps` - 바 타임스탬프 (기준과 같은 길이)
    ///
    /// # Returns
    /// * `IndicatorResult<Vec<SignalEvent>>` - 발생한 신호 이벤트 목록
    ///
    /// # Errors
    /// * 입력 길이가 서로 다르면 `LengthMismatch` 반환
    pub fn scan(
        &self,
        base: &[f64],
        bands: &BandPair,
        timestamps: &[i64],
    ) -> IndicatorResult<Vec<SignalEvent>> {
        if base.len() != bands.len() {
            return Err(IndicatorError::LengthMismatch {
                left: base.len(),
                right: bands.len(),
            });
        }

        if base.len() != timestamps.len() {
            return Err(IndicatorError::LengthMismatch {
                left: base.len(),
                right: timestamps.len(),
            });
        }

        let mut events = Vec::new();
        for i in 0..base.len() {
            let (Some(upper), Some(lower)) = (bands.upper[i], bands.lower[i]) else {
                continue;
            };

            // 과매수를 먼저 평가, 아니면 과매도 (상호 배타)
            let mut kind = if base[i] > upper {
                Some(SignalKind::Overbought)
            } else if base[i] < lower {
                Some(SignalKind::Oversold)
            } else {
                None
            };

            if self.is_squeeze_at(bands, i, upper - lower) {
                kind = Some(match kind {
                    Some(flag) => flag.with_squeeze(),
                    None => SignalKind::Squeeze,
                });
            }

            if let Some(kind) = kind {
                debug!("신호 감지: 인덱스 {} ({})", i, kind);
                events.push(SignalEvent {
                    index: i,
                    timestamp: timestamps[i],
                    kind,
                });
            }
        }

        Ok(events)
    }

    /// 인덱스 i의 밴드 폭이 후행 룩백 윈도우의 최소 폭인지 확인
    ///
    /// 윈도우는 밴드가 존재하는 인덱스로 제한되며, 현재 폭이 최소와
    /// 같아도 (비엄격 비교) 스퀴즈로 판정합니다.
    fn is_squeeze_at(&self, bands: &BandPair, index: usize, current_width: f64) -> bool {
        if index + 1 < self.squeeze_lookback {
            return false;
        }

        let min_width = (index + 1 - self.squeeze_lookback..=index)
            .filter_map(|j| bands.width(j))
            .fold(f64::INFINITY, f64::min);

        current_width <= min_width
    }

    /// 신호 이벤트별 룩어헤드 가격 반응 평가
    ///
    /// 각 신호 인덱스 i에 대해 `i + lookahead`가 범위 내이면
    /// `close[i+lookahead] - close[i]`의 방향(상승/하락/보합)을 보고하고,
    /// 아니면 미래 데이터 부족으로 표시합니다 (실패하지 않음).
    ///
    /// # Arguments
    /// * `events` - 스캔된 신호 이벤트 목록
    /// * `closes` - 종가 시퀀스
    ///
    /// # Returns
    /// * `Vec<SignalReaction>` - 신호당 한 항목의 반응 요약
    pub fn evaluate_reactions(
        &self,
        events: &[SignalEvent],
        closes: &[f64],
    ) -> Vec<SignalReaction> {
        events
            .iter()
            .map(|&event| {
                let start_close = closes[event.index];
                let future_index = event.index + self.lookahead;

                if future_index < closes.len() {
                    let future_close = closes[future_index];
                    let delta = future_close - start_close;
                    let direction = if delta > 0.0 {
                        PriceDirection::Up
                    } else if delta < 0.0 {
                        PriceDirection::Down
                    } else {
                        PriceDirection::Flat
                    };

                    SignalReaction {
                        event,
                        start_close,
                        future_close: Some(future_close),
                        direction: Some(direction),
                    }
                } else {
                    SignalReaction {
                        event,
                        start_close,
                        future_close: None,
                        direction: None,
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::InsufficientDataPolicy;
    use crate::indicator::bband::bollinger_bands;
    use crate::indicator::ema::ema_series;

    fn timestamps(n: usize) -> Vec<i64> {
        (0..n as i64).map(|i| i * 1000).collect()
    }

    /// 중심선이 상수 0이고 밴드 폭을 직접 제어하는 밴드 쌍 구성
    fn fixed_bands(widths: &[f64]) -> BandPair {
        let n = widths.len();
        let base = vec![0.0; n];
        // 중심이 모두 존재하는 밴드를 만들기 위해 period=1 사용
        let center: Vec<Option<f64>> = vec![Some(0.0); n];
        let mut bands = bollinger_bands(&base, &center, 1, 2.0).unwrap();
        for (i, &w) in widths.iter().enumerate() {
            bands.upper[i] = Some(w / 2.0);
            bands.lower[i] = Some(-w / 2.0);
        }
        bands
    }

    #[test]
    fn test_scan_overbought_and_oversold() {
        // 폭 2.0 고정 밴드 (상단 +1, 하단 -1), 룩백을 크게 잡아 스퀴즈 배제
        let bands = fixed_bands(&[2.0; 5]);
        let base = vec![0.0, 1.5, 0.0, -1.5, 0.5];
        let scanner = BandScanner::new(10, 3);

        let events = scanner.scan(&base, &bands, &timestamps(5)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 1);
        assert_eq!(events[0].kind, SignalKind::Overbought);
        assert_eq!(events[1].index, 3);
        assert_eq!(events[1].kind, SignalKind::Oversold);
        assert_eq!(events[1].timestamp, 3000);
    }

    #[test]
    fn test_scan_squeeze_on_minimum_width() {
        // 마지막 폭이 룩백 윈도우 최소 ⇒ 스퀴즈
        let bands = fixed_bands(&[5.0, 4.0, 3.0, 2.0]);
        let base = vec![0.0; 4];
        let scanner = BandScanner::new(3, 3);

        let events = scanner.scan(&base, &bands, &timestamps(4)).unwrap();
        // 인덱스 2(폭 3.0이 [5,4,3] 최소)와 3(폭 2.0이 [4,3,2] 최소)에서 발생
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].kind, SignalKind::Squeeze);
        assert_eq!(events[1].index, 3);
    }

    #[test]
    fn test_scan_squeeze_tie_still_qualifies() {
        // 동률 최소 폭도 스퀴즈로 판정 (비엄격 최소)
        let bands = fixed_bands(&[2.0, 2.0, 2.0]);
        let base = vec![0.0; 3];
        let scanner = BandScanner::new(3, 3);

        let events = scanner.scan(&base, &bands, &timestamps(3)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].kind, SignalKind::Squeeze);
    }

    #[test]
    fn test_scan_combined_overbought_squeeze() {
        let bands = fixed_bands(&[4.0, 3.0, 2.0]);
        // 마지막 인덱스에서 상단(+1.0) 돌파 + 최소 폭
        let base = vec![0.0, 0.0, 1.5];
        let scanner = BandScanner::new(3, 3);

        let events = scanner.scan(&base, &bands, &timestamps(3)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SignalKind::OverboughtSqueeze);
        assert_eq!(events[0].kind.to_string(), "Overbought & Squeeze");
    }

    #[test]
    fn test_scan_no_signal_before_lookback() {
        // 룩백 이전 인덱스에서는 스퀴즈가 판정되지 않음
        let bands = fixed_bands(&[2.0, 2.0]);
        let base = vec![0.0, 0.0];
        let scanner = BandScanner::new(3, 3);

        let events = scanner.scan(&base, &bands, &timestamps(2)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_scan_skips_absent_bands() {
        // 밴드 워밍업 구간은 분류 대상이 아님
        let base = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let center = ema_series(&base, 3, InsufficientDataPolicy::AllAbsent).unwrap();
        let bands = bollinger_bands(&base, &center, 3, 2.0).unwrap();
        let scanner = BandScanner::new(10, 3);

        let events = scanner.scan(&base, &bands, &timestamps(5)).unwrap();
        for event in &events {
            assert!(event.index >= 2);
        }
    }

    #[test]
    fn test_scan_flat_series_only_squeeze() {
        // 보합 시퀀스: 분산 0 ⇒ 상단 == 하단 == 중심, 기준이 밴드를 넘지 못함
        // (스퀴즈 판정 대상이 아닌 과매수/과매도는 발생 불가)
        let base = vec![0.0; 20];
        let center: Vec<Option<f64>> = vec![Some(0.0); 20];
        let bands = bollinger_bands(&base, &center, 3, 2.0).unwrap();
        let scanner = BandScanner::new(10, 3);

        let events = scanner.scan(&base, &bands, &timestamps(20)).unwrap();
        for event in &events {
            // 발생 가능한 것은 스퀴즈뿐 (모든 폭이 0으로 동률)
            assert_eq!(event.kind, SignalKind::Squeeze);
        }
    }

    #[test]
    fn test_scan_length_mismatch() {
        let bands = fixed_bands(&[2.0, 2.0]);
        let scanner = BandScanner::default();

        let result = scanner.scan(&[0.0], &bands, &timestamps(1));
        assert_eq!(
            result.unwrap_err(),
            IndicatorError::LengthMismatch { left: 1, right: 2 }
        );

        let result = scanner.scan(&[0.0, 0.0], &bands, &timestamps(3));
        assert_eq!(
            result.unwrap_err(),
            IndicatorError::LengthMismatch { left: 2, right: 3 }
        );
    }

    #[test]
    fn test_reactions_direction() {
        let closes = vec![10.0, 11.0, 12.0, 13.0, 9.0, 10.0, 10.0, 10.0];
        let scanner = BandScanner::new(6, 3);
        let events = vec![
            SignalEvent {
                index: 0,
                timestamp: 0,
                kind: SignalKind::Overbought,
            },
            SignalEvent {
                index: 1,
                timestamp: 1000,
                kind: SignalKind::Oversold,
            },
            SignalEvent {
                index: 4,
                timestamp: 4000,
                kind: SignalKind::Squeeze,
            },
        ];

        let reactions = scanner.evaluate_reactions(&events, &closes);
        assert_eq!(reactions.len(), 3);

        // 10.0 → 13.0: 상승
        assert_eq!(reactions[0].direction, Some(PriceDirection::Up));
        assert_eq!(reactions[0].future_close, Some(13.0));

        // 11.0 → 9.0: 하락
        assert_eq!(reactions[1].direction, Some(PriceDirection::Down));

        // 9.0 → 10.0 이후 보합: 인덱스 4 + 3 = 7, 9.0 → 10.0 상승
        assert_eq!(reactions[2].direction, Some(PriceDirection::Up));
    }

    #[test]
    fn test_reactions_flat_direction() {
        let closes = vec![10.0, 10.0, 10.0, 10.0];
        let scanner = BandScanner::new(6, 3);
        let events = vec![SignalEvent {
            index: 0,
            timestamp: 0,
            kind: SignalKind::Squeeze,
        }];

        let reactions = scanner.evaluate_reactions(&events, &closes);
        assert_eq!(reactions[0].direction, Some(PriceDirection::Flat));
    }

    #[test]
    fn test_reactions_insufficient_future_data() {
        let closes = vec![10.0, 11.0, 12.0];
        let scanner = BandScanner::new(6, 3);
        let events = vec![SignalEvent {
            index: 1,
            timestamp: 1000,
            kind: SignalKind::Overbought,
        }];

        // 인덱스 1 + 룩어헤드 3 = 4는 범위 밖: 실패가 아니라 부족 표시
        let reactions = scanner.evaluate_reactions(&events, &closes);
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].future_close, None);
        assert_eq!(reactions[0].direction, None);
        assert_eq!(reactions[0].start_close, 11.0);
    }

    #[test]
    #[should_panic(expected = "스퀴즈 룩백 기간은 0보다 커야 합니다")]
    fn test_scanner_invalid_lookback() {
        BandScanner::new(0, 3);
    }
}

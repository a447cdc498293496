use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들(바) 데이터 접근 트레이트
///
/// 지표 엔진이 소비하는 최소한의 OHLCV 접근 인터페이스입니다.
/// 수집 어댑터는 타임스탬프가 오름차순으로 정렬된 캔들을 전달해야 합니다.
pub trait Candle: Clone + Debug + Display + Send + PartialEq {
    /// 캔들 타임스탬프 (epoch 밀리초, UTC)
    fn timestamp_ms(&self) -> i64;

    /// 시가
    fn open_price(&self) -> f64;

    /// 고가
    fn high_price(&self) -> f64;

    /// 저가
    fn low_price(&self) -> f64;

    /// 종가
    fn close_price(&self) -> f64;

    /// 거래량
    fn volume(&self) -> f64;

    /// 타임스탬프를 UTC 날짜시간으로 변환
    fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_ms()).unwrap_or_default()
    }
}

/// 하나의 거래 기간에 대한 OHLCV 관측값
///
/// 타임스탬프는 epoch 밀리초(UTC)이며, 한 번 생성되면 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// epoch 밀리초 (UTC)
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// 새 바 인스턴스 생성
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bar(t={}, o={}, h={}, l={}, c={}, v={})",
            self.timestamp, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl Candle for Bar {
    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    fn open_price(&self) -> f64 {
        self.open
    }

    fn high_price(&self) -> f64 {
        self.high
    }

    fn low_price(&self) -> f64 {
        self.low
    }

    fn close_price(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// 밴드 스캐너가 발행하는 신호 종류
///
/// 과매수/과매도는 상호 배타적이며, 스퀴즈는 둘 중 하나와 결합될 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalKind {
    /// 기준 시리즈가 상단 밴드 위
    Overbought,
    /// 기준 시리즈가 하단 밴드 아래
    Oversold,
    /// 밴드 폭이 최근 구간 최소
    Squeeze,
    /// 과매수 + 스퀴즈 동시
    OverboughtSqueeze,
    /// 과매도 + 스퀴즈 동시
    OversoldSqueeze,
}

impl SignalKind {
    /// 과매수 계열 신호인지 확인
    pub fn is_overbought(&self) -> bool {
        matches!(self, SignalKind::Overbought | SignalKind::OverboughtSqueeze)
    }

    /// 과매도 계열 신호인지 확인
    pub fn is_oversold(&self) -> bool {
        matches!(self, SignalKind::Oversold | SignalKind::OversoldSqueeze)
    }

    /// 스퀴즈 계열 신호인지 확인
    pub fn is_squeeze(&self) -> bool {
        matches!(
            self,
            SignalKind::Squeeze | SignalKind::OverboughtSqueeze | SignalKind::OversoldSqueeze
        )
    }

    /// 스퀴즈 플래그를 결합한 신호 반환
    pub fn with_squeeze(self) -> SignalKind {
        match self {
            SignalKind::Overbought => SignalKind::OverboughtSqueeze,
            SignalKind::Oversold => SignalKind::OversoldSqueeze,
            other => other,
        }
    }
}

impl Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Overbought => write!(f, "Overbought"),
            SignalKind::Oversold => write!(f, "Oversold"),
            SignalKind::Squeeze => write!(f, "Squeeze"),
            SignalKind::OverboughtSqueeze => write!(f, "Overbought & Squeeze"),
            SignalKind::OversoldSqueeze => write!(f, "Oversold & Squeeze"),
        }
    }
}

/// 특정 바 인덱스에서 발생한 신호 이벤트
///
/// 신호는 저장되지 않고 지표 시리즈로부터 결정적으로 재계산됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalEvent {
    /// 신호가 발생한 바 인덱스
    pub index: usize,
    /// 해당 바의 타임스탬프 (epoch 밀리초)
    pub timestamp: i64,
    /// 신호 종류
    pub kind: SignalKind,
}

impl Display for SignalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signal({} @ {}: {})", self.index, self.timestamp, self.kind)
    }
}

/// 신호 이후 가격 반응 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceDirection {
    /// 상승
    Up,
    /// 하락
    Down,
    /// 보합
    Flat,
}

impl Display for PriceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceDirection::Up => write!(f, "↑"),
            PriceDirection::Down => write!(f, "↓"),
            PriceDirection::Flat => write!(f, "→"),
        }
    }
}

/// 신호 이벤트에 대한 룩어헤드 가격 반응 요약
///
/// `future_close`와 `direction`이 `None`이면 룩어헤드 범위의
/// 미래 데이터가 부족하다는 뜻입니다 (실패가 아닌 정상 결과).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalReaction {
    /// 원본 신호 이벤트
    pub event: SignalEvent,
    /// 신호 시점 종가
    pub start_close: f64,
    /// 룩어헤드 시점 종가 (미래 데이터 부족 시 None)
    pub future_close: Option<f64>,
    /// 가격 반응 방향 (미래 데이터 부족 시 None)
    pub direction: Option<PriceDirection>,
}

impl Display for SignalReaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.future_close, self.direction) {
            (Some(future), Some(direction)) => write!(
                f,
                "{}: price {} from {:.2} to {:.2}",
                self.event, direction, self.start_close, future
            ),
            _ => write!(f, "{}: 미래 데이터 부족", self.event),
        }
    }
}

use crate::analyzer::BandScanner;
use crate::candle_store::CandleStore;
use crate::config_loader::EngineConfig;
use crate::error::IndicatorResult;
use crate::indicator::adl::{AdlBuilder, AdlOutput};
use crate::indicator::bband::bollinger_bands;
use crate::indicator::ema::{ema_series, sma_series};
use crate::indicator::macd::macd_series;
use crate::indicator::obv::obv_series;
use crate::indicator::rsi::rsi_series;
use crate::indicator::volume::volume_change_series;
use crate::indicator::IndicatorSeries;
use crate::model::{Candle, SignalEvent, SignalReaction};
use log::{debug, info};
use std::fmt::Display;

/// OBV 밴드 분석 결과
///
/// OBV → OBV EMA → 볼린저 밴드 → 신호 → 룩어헤드 반응의 전체
/// 파이프라인 출력입니다. 모든 시리즈는 입력 바와 1:1로 정렬됩니다.
#[derive(Debug, Clone)]
pub struct ObvBandAnalysis {
    /// OBV 시리즈 (항상 존재)
    pub obv: IndicatorSeries,
    /// OBV의 EMA 시리즈
    pub obv_ema: IndicatorSeries,
    /// 상단 밴드 시리즈
    pub upper_band: IndicatorSeries,
    /// 하단 밴드 시리즈
    pub lower_band: IndicatorSeries,
    /// 발생한 신호 이벤트
    pub signals: Vec<SignalEvent>,
    /// 신호별 룩어헤드 가격 반응
    pub reactions: Vec<SignalReaction>,
}

impl Display for ObvBandAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ObvBandAnalysis(len={}, signals={})",
            self.obv.len(),
            self.signals.len()
        )
    }
}

/// MACD 분석 결과 (타임스탬프 정렬)
#[derive(Debug, Clone)]
pub struct MacdAnalysis {
    /// MACD 라인
    pub macd: IndicatorSeries,
    /// 시그널 라인
    pub signal: IndicatorSeries,
    /// 히스토그램
    pub histogram: IndicatorSeries,
}

/// 통합 지표 엔진
///
/// 흩어져 있던 지표 계산들을 하나의 매개변수화된 엔진으로 통합합니다.
/// 설정(기간, 밴드 매개변수, 데이터 부족 정책)을 한 번 주입받아 모든
/// 지표 연산에 일관되게 적용하며, 입력 바 시퀀스를 변경하지 않는 순수
/// 계산만 수행합니다.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: EngineConfig,
}

impl Display for IndicatorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IndicatorEngine(bband={}, policy={})",
            self.config.bband_period, self.config.insufficient_data_policy
        )
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        IndicatorEngine::new(EngineConfig::default())
    }
}

impl IndicatorEngine {
    /// 새 지표 엔진 생성
    ///
    /// # Arguments
    /// * `config` - 엔진 설정
    ///
    /// # Returns
    /// * `IndicatorEngine` - 새 엔진 인스턴스
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            "지표 엔진 생성: bband_period={}, squeeze_lookback={}, policy={}",
            config.bband_period, config.squeeze_lookback, config.insufficient_data_policy
        );
        IndicatorEngine { config }
    }

    /// 엔진 설정 참조 반환
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 종가 추출
    fn closes<C: Candle>(data: &[C]) -> Vec<f64> {
        data.iter().map(|c| c.close_price()).collect()
    }

    /// 거래량 추출
    fn volumes<C: Candle>(data: &[C]) -> Vec<f64> {
        data.iter().map(|c| c.volume()).collect()
    }

    /// 타임스탬프 추출
    fn timestamps<C: Candle>(data: &[C]) -> Vec<i64> {
        data.iter().map(|c| c.timestamp_ms()).collect()
    }

    /// 지정 기간의 종가 EMA 시리즈 계산
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    /// * `period` - EMA 기간
    ///
    /// # Returns
    /// * `IndicatorResult<IndicatorSeries>` - 입력 바당 한 항목의 EMA 시리즈
    pub fn ema<C: Candle>(&self, data: &[C], period: usize) -> IndicatorResult<IndicatorSeries> {
        let values = ema_series(
            &Self::closes(data),
            period,
            self.config.insufficient_data_policy,
        )?;
        Ok(IndicatorSeries::new(Self::timestamps(data), values))
    }

    /// 설정된 모든 기간의 종가 EMA 시리즈 계산
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<Vec<(usize, IndicatorSeries)>>` - (기간, 시리즈) 쌍 목록
    pub fn emas<C: Candle>(&self, data: &[C]) -> IndicatorResult<Vec<(usize, IndicatorSeries)>> {
        self.config
            .ema_periods
            .iter()
            .map(|&period| self.ema(data, period).map(|series| (period, series)))
            .collect()
    }

    /// 지정 기간의 종가 SMA 시리즈 계산
    pub fn sma<C: Candle>(&self, data: &[C], period: usize) -> IndicatorResult<IndicatorSeries> {
        let values = sma_series(
            &Self::closes(data),
            period,
            self.config.insufficient_data_policy,
        )?;
        Ok(IndicatorSeries::new(Self::timestamps(data), values))
    }

    /// 설정된 기간의 RSI 시리즈 계산
    pub fn rsi<C: Candle>(&self, data: &[C]) -> IndicatorResult<IndicatorSeries> {
        let values = rsi_series(
            &Self::closes(data),
            self.config.rsi_period,
            self.config.insufficient_data_policy,
        )?;
        Ok(IndicatorSeries::new(Self::timestamps(data), values))
    }

    /// OBV 시리즈 계산
    pub fn obv<C: Candle>(&self, data: &[C]) -> IndicatorResult<IndicatorSeries> {
        let values = obv_series(&Self::closes(data), &Self::volumes(data))?
            .into_iter()
            .map(Some)
            .collect();
        Ok(IndicatorSeries::new(Self::timestamps(data), values))
    }

    /// ADL(매집/분산 라인) 계산
    pub fn adl<C: Candle>(&self, data: &[C]) -> AdlOutput {
        AdlBuilder::new().compute(data)
    }

    /// 설정된 매개변수의 MACD 분석 계산
    pub fn macd<C: Candle>(&self, data: &[C]) -> IndicatorResult<MacdAnalysis> {
        let output = macd_series(
            &Self::closes(data),
            &self.config.macd,
            self.config.insufficient_data_policy,
        )?;
        let timestamps = Self::timestamps(data);

        Ok(MacdAnalysis {
            macd: IndicatorSeries::new(timestamps.clone(), output.macd),
            signal: IndicatorSeries::new(timestamps.clone(), output.signal),
            histogram: IndicatorSeries::new(timestamps, output.histogram),
        })
    }

    /// 바별 거래량 변화율 시리즈 계산
    pub fn volume_change<C: Candle>(&self, data: &[C]) -> IndicatorSeries {
        volume_change_series(data)
    }

    /// OBV 밴드 분석 파이프라인 실행
    ///
    /// OBV를 계산하고, 그 위에 설정된 기간의 EMA와 볼린저 밴드를 씌운 뒤
    /// 과매수/과매도/스퀴즈 신호를 스캔하고 룩어헤드 가격 반응까지
    /// 평가합니다.
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 시퀀스
    ///
    /// # Returns
    /// * `IndicatorResult<ObvBandAnalysis>` - 전체 파이프라인 결과
    pub fn obv_band_analysis<C: Candle>(&self, data: &[C]) -> IndicatorResult<ObvBandAnalysis> {
        let closes = Self::closes(data);
        let volumes = Self::volumes(data);
        let timestamps = Self::timestamps(data);

        let obv = obv_series(&closes, &volumes)?;
        let obv_ema = ema_series(
            &obv,
            self.config.bband_period,
            self.config.insufficient_data_policy,
        )?;
        let bands = bollinger_bands(
            &obv,
            &obv_ema,
            self.config.bband_period,
            self.config.bband_multiplier,
        )?;

        let scanner = BandScanner::new(self.config.squeeze_lookback, self.config.lookahead);
        let signals = scanner.scan(&obv, &bands, &timestamps)?;
        let reactions = scanner.evaluate_reactions(&signals, &closes);

        info!(
            "OBV 밴드 분석 완료: {}개 바, {}개 신호",
            data.len(),
            signals.len()
        );

        Ok(ObvBandAnalysis {
            obv: IndicatorSeries::new(timestamps.clone(), obv.into_iter().map(Some).collect()),
            obv_ema: IndicatorSeries::new(timestamps.clone(), obv_ema),
            upper_band: IndicatorSeries::new(timestamps.clone(), bands.upper),
            lower_band: IndicatorSeries::new(timestamps, bands.lower),
            signals,
            reactions,
        })
    }

    /// 저장소에서 OBV 밴드 분석 파이프라인 실행
    ///
    /// # Arguments
    /// * `storage` - 캔들 데이터 저장소
    ///
    /// # Returns
    /// * `IndicatorResult<ObvBandAnalysis>` - 전체 파이프라인 결과
    pub fn obv_band_analysis_from_storage<C: Candle>(
        &self,
        storage: &CandleStore<C>,
    ) -> IndicatorResult<ObvBandAnalysis> {
        self.obv_band_analysis(storage.items())
    }
}

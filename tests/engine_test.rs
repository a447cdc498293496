
use common_test_utils::{bars_from_closes, bars_with_volumes, flat_bars, uptrend_bars};
use stock_indicator::config_loader::EngineConfig;
use stock_indicator::engine::IndicatorEngine;
use stock_indicator::error::IndicatorError;
use stock_indicator::indicator::InsufficientDataPolicy;
use stock_indicator::model::PriceDirection;

#[test]
fn test_all_series_align_with_input() {
    // 정렬 불변식: 모든 지표 시리즈는 입력 바 수와 같은 길이
    let bars = uptrend_bars(50, 100.0, 1.0);
    let engine = IndicatorEngine::default();

    assert_eq!(engine.rsi(&bars).unwrap().len(), bars.len());
    assert_eq!(engine.obv(&bars).unwrap().len(), bars.len());
    assert_eq!(engine.adl(&bars).adl.len(), bars.len());
    assert_eq!(engine.volume_change(&bars).len(), bars.len());

    for (_, series) in engine.emas(&bars).unwrap() {
        assert_eq!(series.len(), bars.len());
    }

    let macd = engine.macd(&bars).unwrap();
    assert_eq!(macd.macd.len(), bars.len());
    assert_eq!(macd.signal.len(), bars.len());
    assert_eq!(macd.histogram.len(), bars.len());
}

#[test]
fn test_obv_scenario() {
    // closes=[10,11,12,11,10], volumes 모두 100 ⇒ OBV=[0,100,200,100,0]
    let bars = bars_with_volumes(
        &[10.0, 11.0, 12.0, 11.0, 10.0],
        &[100.0, 100.0, 100.0, 100.0, 100.0],
    );
    let engine = IndicatorEngine::default();
    let obv = engine.obv(&bars).unwrap();

    let values: Vec<f64> = (0..5).map(|i| obv.value(i).unwrap()).collect();
    assert_eq!(values, vec![0.0, 100.0, 200.0, 100.0, 0.0]);
}

#[test]
fn test_ema_scenario() {
    // values=[1..5], period=3 ⇒ [_,_,2.0,3.0,4.0]
    let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let engine = IndicatorEngine::default();
    let ema = engine.ema(&bars, 3).unwrap();

    assert_eq!(ema.value(0), None);
    assert_eq!(ema.value(1), None);
    assert_eq!(ema.value(2), Some(2.0));
    assert_eq!(ema.value(3), Some(3.0));
    assert_eq!(ema.value(4), Some(4.0));
}

#[test]
fn test_rsi_short_input_scenario() {
    // period+1 미만의 종가 ⇒ 같은 길이의 전체 부재 시리즈
    let bars = bars_from_closes(&[10.0, 11.0, 12.0]);
    let engine = IndicatorEngine::default();
    let rsi = engine.rsi(&bars).unwrap();

    assert_eq!(rsi.len(), 3);
    assert_eq!(rsi.present_count(), 0);
}

#[test]
fn test_flat_series_scenario() {
    // 20개 보합 바: OBV 전 구간 0, 밴드는 전부 중심과 일치,
    // 과매수/과매도 신호는 절대 발생하지 않음
    let bars = flat_bars(20, 100.0, 1000.0);
    let config = EngineConfig {
        bband_period: 5,
        ..EngineConfig::default()
    };
    let engine = IndicatorEngine::new(config);
    let analysis = engine.obv_band_analysis(&bars).unwrap();

    for i in 0..20 {
        assert_eq!(analysis.obv.value(i), Some(0.0));
    }
    for i in 4..20 {
        assert_eq!(analysis.upper_band.value(i), analysis.obv_ema.value(i));
        assert_eq!(analysis.lower_band.value(i), analysis.obv_ema.value(i));
    }
    for signal in &analysis.signals {
        assert!(!signal.kind.is_overbought());
        assert!(!signal.kind.is_oversold());
    }
}

#[test]
fn test_adl_zero_range_scenario() {
    // high == low인 바의 CLV는 부재이고 ADL은 직전 누적값을 유지
    let mut bars = uptrend_bars(5, 100.0, 1.0);
    // 세 번째 바를 범위 0으로 교체
    bars[2].high = bars[2].close;
    bars[2].low = bars[2].close;
    bars[2].open = bars[2].close;

    let engine = IndicatorEngine::default();
    let output = engine.adl(&bars);

    assert_eq!(output.clv[2], None);
    assert_eq!(output.mfv[2], None);
    assert_eq!(output.adl[2], output.adl[1]);
    assert_eq!(output.adl.len(), bars.len());
}

#[test]
fn test_fail_policy_surfaces_error() {
    // Fail 정책에서는 부족 데이터가 명시적 오류로 표면화됨
    let bars = bars_from_closes(&[10.0, 11.0]);
    let config = EngineConfig {
        insufficient_data_policy: InsufficientDataPolicy::Fail,
        ..EngineConfig::default()
    };
    let engine = IndicatorEngine::new(config);

    let result = engine.rsi(&bars);
    assert_eq!(
        result.unwrap_err(),
        IndicatorError::InsufficientData {
            required: 15,
            actual: 2
        }
    );

    // 기본(AllAbsent) 정책이면 같은 입력이 전체 부재 시리즈를 반환
    let engine = IndicatorEngine::default();
    assert_eq!(engine.rsi(&bars).unwrap().present_count(), 0);
}

#[test]
fn test_obv_pipeline_end_to_end() {
    // 25개 보합 바 뒤 거래량 급증 상승 1개 + 보합 3개:
    // 급증 바에서 과매수 신호, 룩어헤드 반응은 보합
    let mut closes = vec![100.0; 25];
    let mut volumes = vec![1000.0; 25];
    closes.push(101.0);
    volumes.push(50_000.0);
    closes.extend_from_slice(&[101.0, 101.0, 101.0]);
    volumes.extend_from_slice(&[1000.0, 1000.0, 1000.0]);
    let bars = bars_with_volumes(&closes, &volumes);

    let engine = IndicatorEngine::default();
    let analysis = engine.obv_band_analysis(&bars).unwrap();

    let spike_signal = analysis
        .signals
        .iter()
        .find(|s| s.index == 25)
        .expect("급증 바에서 신호가 발생해야 함");
    assert!(spike_signal.kind.is_overbought());
    assert_eq!(spike_signal.timestamp, 25 * 86_400_000);

    let spike_reaction = analysis
        .reactions
        .iter()
        .find(|r| r.event.index == 25)
        .unwrap();
    assert_eq!(spike_reaction.direction, Some(PriceDirection::Flat));
    assert_eq!(spike_reaction.future_close, Some(101.0));

    // 신호와 반응은 1:1 대응
    assert_eq!(analysis.signals.len(), analysis.reactions.len());
}

#[test]
fn test_config_policy_applies_to_pipeline() {
    // 밴드 기간보다 짧은 입력: Fail 정책이면 파이프라인 전체가 오류
    let bars = flat_bars(5, 100.0, 1000.0);
    let config = EngineConfig {
        insufficient_data_policy: InsufficientDataPolicy::Fail,
        ..EngineConfig::default()
    };
    let engine = IndicatorEngine::new(config);

    assert!(engine.obv_band_analysis(&bars).is_err());

    // AllAbsent 정책이면 신호 없이 정렬된 부재 시리즈를 반환
    let engine = IndicatorEngine::default();
    let analysis = engine.obv_band_analysis(&bars).unwrap();
    assert_eq!(analysis.obv_ema.present_count(), 0);
    assert!(analysis.signals.is_empty());
}

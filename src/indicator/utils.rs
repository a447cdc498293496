// 지표 계산에 공통으로 쓰이는 수치 유틸리티 함수들

/// 산술 평균 계산
///
/// # Arguments
/// * `values` - 값 배열
///
/// # Returns
/// * `f64` - 산술 평균 (빈 배열이면 0.0 반환)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// 모집단 표준편차 계산
///
/// 표본 표준편차(n-1)가 아닌 모집단 표준편차(n)를 사용합니다.
///
/// # Arguments
/// * `values` - 값 배열
///
/// # Returns
/// * `f64` - 모집단 표준편차 (빈 배열이면 0.0 반환)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = mean(values);
    let variance = values
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

/// 지수이동평균(EMA) 평활화 계수 계산
///
/// # Arguments
/// * `period` - EMA 기간
///
/// # Returns
/// * `f64` - 알파값 (2 / (period + 1))
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period + 1) as f64
}

/// 지수이동평균(EMA) 한 스텝 계산
///
/// 점화식: ema = (current - previous) * alpha + previous
///
/// # Arguments
/// * `current` - 현재 값
/// * `previous` - 이전 EMA 값
/// * `alpha` - 평활화 계수
///
/// # Returns
/// * `f64` - 계산된 EMA 값
pub fn ema_step(current: f64, previous: f64, alpha: f64) -> f64 {
    (current - previous) * alpha + previous
}

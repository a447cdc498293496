use crate::indicator::InsufficientDataPolicy;
use crate::indicator::macd::MacdParams;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 설정 로드 오류
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 오류
    FileError(String),
    /// 파싱 오류
    ParseError(String),
    /// 유효성 검사 오류
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileError(msg) => write!(f, "설정 파일 오류: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "설정 파싱 오류: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "설정 유효성 검사 오류: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON 형식
    Json,
    /// TOML 형식
    Toml,
    /// 자동 감지 (파일 확장자로부터)
    Auto,
}

/// 설정 유효성 검사 트레이트
pub trait ConfigValidation {
    /// 설정 유효성 검사
    fn validate(&self) -> ConfigResult<()>;
}

/// 기본 설정 파일 경로
static DEFAULT_CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| PathBuf::from("config/engine.toml"));

/// 기본 설정 파일 경로 반환
pub fn default_config_path() -> &'static Path {
    &DEFAULT_CONFIG_PATH
}

/// 지표 엔진 설정
///
/// 지표 기간, 밴드 매개변수, 스캐너 매개변수와 데이터 부족 정책을
/// 하나의 설정 객체로 통합합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// EMA 계산 기간 목록 (오름차순)
    #[serde(default = "default_ema_periods")]
    pub ema_periods: Vec<usize>,
    /// RSI 계산 기간
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    /// 볼린저 밴드 기간 (OBV EMA 기간과 공유)
    #[serde(default = "default_bband_period")]
    pub bband_period: usize,
    /// 볼린저 밴드 표준편차 승수
    #[serde(default = "default_bband_multiplier")]
    pub bband_multiplier: f64,
    /// 스퀴즈 판정 룩백 기간
    #[serde(default = "default_squeeze_lookback")]
    pub squeeze_lookback: usize,
    /// 신호 반응 평가 룩어헤드 바 수
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
    /// 데이터 부족 시 정책
    #[serde(default)]
    pub insufficient_data_policy: InsufficientDataPolicy,
    /// MACD 매개변수
    #[serde(default)]
    pub macd: MacdParams,
}

fn default_ema_periods() -> Vec<usize> {
    vec![20, 50, 200]
}

fn default_rsi_period() -> usize {
    14
}

fn default_bband_period() -> usize {
    20
}

fn default_bband_multiplier() -> f64 {
    2.0
}

fn default_squeeze_lookback() -> usize {
    6
}

fn default_lookahead() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            ema_periods: default_ema_periods(),
            rsi_period: default_rsi_period(),
            bband_period: default_bband_period(),
            bband_multiplier: default_bband_multiplier(),
            squeeze_lookback: default_squeeze_lookback(),
            lookahead: default_lookahead(),
            insufficient_data_policy: InsufficientDataPolicy::default(),
            macd: MacdParams::default(),
        }
    }
}

impl ConfigValidation for EngineConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.ema_periods.is_empty() {
            return Err(ConfigError::ValidationError(
                "EMA 기간 목록이 비어 있습니다".to_string(),
            ));
        }

        for period in &self.ema_periods {
            if *period == 0 {
                return Err(ConfigError::ValidationError(
                    "EMA 기간은 0보다 커야 합니다".to_string(),
                ));
            }
        }

        // 기간이 오름차순으로 정렬되어 있는지 확인
        for i in 1..self.ema_periods.len() {
            if self.ema_periods[i] <= self.ema_periods[i - 1] {
                return Err(ConfigError::ValidationError(format!(
                    "EMA 기간은 오름차순으로 정렬되어야 합니다: {:?}",
                    self.ema_periods
                )));
            }
        }

        if self.rsi_period == 0 {
            return Err(ConfigError::ValidationError(
                "RSI 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.macd.short_period == 0 || self.macd.long_period == 0 || self.macd.signal_period == 0
        {
            return Err(ConfigError::ValidationError(
                "MACD 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.macd.short_period >= self.macd.long_period {
            return Err(ConfigError::ValidationError(
                "MACD 빠른 기간은 느린 기간보다 작아야 합니다".to_string(),
            ));
        }

        if self.bband_period == 0 {
            return Err(ConfigError::ValidationError(
                "볼린저 밴드 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.bband_multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "볼린저 밴드 승수는 0보다 커야 합니다".to_string(),
            ));
        }

        if self.squeeze_lookback == 0 {
            return Err(ConfigError::ValidationError(
                "스퀴즈 룩백 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (기본값: Auto)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = if format == ConfigFormat::Auto {
            Self::detect_format(path)?
        } else {
            format
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(&content)?,
            ConfigFormat::Toml => Self::parse_toml(&content)?,
            ConfigFormat::Auto => unreachable!(),
        };

        // 유효성 검사
        if let Err(e) = config.validate() {
            error!("설정 유효성 검사 실패: {}", e);
            return Err(e);
        }

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    ///
    /// # Arguments
    /// * `content` - 설정 문자열
    /// * `format` - 설정 형식
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => {
                // JSON으로 먼저 시도 후 실패하면 TOML 시도
                match Self::parse_json::<T>(content) {
                    Ok(config) => config,
                    Err(_) => Self::parse_toml(content)?,
                }
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// 설정 파일 저장
    ///
    /// # Arguments
    /// * `config` - 설정 객체
    /// * `path` - 저장할 파일 경로
    /// * `format` - 설정 파일 형식
    ///
    /// # Returns
    /// * `ConfigResult<()>` - 성공 또는 오류
    pub fn save_to_file<T>(config: &T, path: &Path, format: ConfigFormat) -> ConfigResult<()>
    where
        T: Serialize + ConfigValidation,
    {
        debug!("설정 파일 저장 시작: {}", path.display());

        let format = if format == ConfigFormat::Auto {
            Self::detect_format(path).unwrap_or(ConfigFormat::Toml)
        } else {
            format
        };

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("JSON 직렬화 실패: {}", e)))?,
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::ParseError(format!("TOML 직렬화 실패: {}", e)))?,
            ConfigFormat::Auto => unreachable!(),
        };

        std::fs::write(path, &content).map_err(|e| {
            error!("설정 파일 쓰기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 쓰기 실패: {}", e))
        })?;

        info!("설정 파일 저장 완료: {}", path.display());
        Ok(())
    }

    // 내부 헬퍼 메서드

    /// JSON 파싱
    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    /// TOML 파싱
    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    /// 파일 형식 감지
    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}

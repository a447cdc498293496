use crate::candle_store::CandleStore;
use crate::model::Candle;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use thiserror::Error;

/// 바 캐시 오류
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// 바 소스 조회 실패
    #[error("바 소스 조회 실패: {0}")]
    Source(String),

    /// 소스가 빈 결과를 반환한 경우
    #[error("바 소스가 빈 결과를 반환했습니다")]
    EmptySource,
}

/// 바 수집 소스 트레이트
///
/// 수집 어댑터(API 호출, 인증, 온디스크 캐시)가 구현하는 조회 지점입니다.
/// 반환되는 캔들의 정렬은 저장소가 보장하므로 소스는 순서를 신경 쓰지
/// 않아도 됩니다.
pub trait BarSource<C: Candle> {
    /// 바 데이터 조회
    ///
    /// # Returns
    /// * `Result<Vec<C>, CacheError>` - 조회된 캔들 목록 또는 오류
    fn fetch(&mut self) -> Result<Vec<C>, CacheError>;
}

/// 수명주기가 명시된 바 캐시
///
/// 생성 → 미스 시 채움 → 신선도 초과 시 무효화의 수명주기를 가지며,
/// 호출자에 주입되어 사용됩니다. 현재 시각은 호출자가 전달하므로
/// 캐시 자체는 시계를 읽지 않습니다.
#[derive(Debug)]
pub struct BarCache<C: Candle, S: BarSource<C>> {
    /// 바 수집 소스
    source: S,
    /// 캐시된 캔들 저장소
    store: CandleStore<C>,
    /// 캐시 유효 기간
    max_age: Duration,
    /// 마지막 갱신 시각 (미갱신 상태면 None)
    refreshed_at: Option<DateTime<Utc>>,
}

impl<C, S> BarCache<C, S>
where
    C: Candle,
    S: BarSource<C>,
{
    /// 새 바 캐시 생성 (빈 상태)
    ///
    /// # Arguments
    /// * `source` - 바 수집 소스
    /// * `max_age` - 캐시 유효 기간
    /// * `max_size` - 저장소 최대 크기
    ///
    /// # Returns
    /// * `BarCache<C, S>` - 생성된 캐시 인스턴스
    pub fn new(source: S, max_age: Duration, max_size: usize) -> BarCache<C, S> {
        BarCache {
            source,
            store: CandleStore::new(Vec::new(), max_size),
            max_age,
            refreshed_at: None,
        }
    }

    /// 캐시가 신선하지 않은지 확인합니다.
    ///
    /// 한 번도 채워지지 않았거나 마지막 갱신 이후 유효 기간이 지났으면
    /// true를 반환합니다.
    ///
    /// # Arguments
    /// * `now` - 현재 시각
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.refreshed_at {
            Some(refreshed_at) => now - refreshed_at > self.max_age,
            None => true,
        }
    }

    /// 캔들 저장소를 반환하며, 필요하면 소스에서 다시 채웁니다.
    ///
    /// 캐시가 신선하면 저장된 데이터를 그대로 반환하고, 비어 있거나
    /// 유효 기간이 지났으면 소스에서 조회하여 교체합니다.
    ///
    /// # Arguments
    /// * `now` - 현재 시각
    ///
    /// # Returns
    /// * `Result<&CandleStore<C>, CacheError>` - 캔들 저장소 또는 오류
    pub fn get(&mut self, now: DateTime<Utc>) -> Result<&CandleStore<C>, CacheError> {
        if !self.is_stale(now) {
            debug!("바 캐시 적중: {}개 캔들", self.store.len());
            return Ok(&self.store);
        }

        debug!("바 캐시 미스 또는 만료, 소스 조회 시작");
        let items = self.source.fetch()?;
        if items.is_empty() {
            warn!("바 소스가 빈 결과를 반환했습니다");
            return Err(CacheError::EmptySource);
        }

        self.store.clear();
        for item in items {
            self.store.add(item);
        }
        self.refreshed_at = Some(now);

        info!("바 캐시 갱신 완료: {}개 캔들", self.store.len());
        Ok(&self.store)
    }

    /// 캐시를 강제로 무효화합니다.
    ///
    /// 다음 `get` 호출 시 소스에서 다시 조회합니다.
    pub fn invalidate(&mut self) {
        debug!("바 캐시 무효화");
        self.refreshed_at = None;
    }

    /// 현재 저장된 캔들 저장소 참조 (갱신 없이)
    pub fn store(&self) -> &CandleStore<C> {
        &self.store
    }

    /// 마지막 갱신 시각
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}

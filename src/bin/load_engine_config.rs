use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use stock_indicator::config_loader::{
    ConfigFormat, ConfigLoader, EngineConfig, default_config_path,
};

fn main() {
    // 로그 초기화
    env_logger::init();

    info!("지표 엔진 설정 로더 시작");

    // 커맨드 라인 인수 파싱
    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    // 설정 파일 경로 (지정되지 않은 경우 기본 경로 사용)
    let config_path = if args.len() >= 2 {
        if args[1] == "--help" {
            println!("사용법: {} [설정_파일_경로]", args[0]);
            println!("  --write-default <경로>  기본 설정을 파일로 저장");
            return;
        }

        if args[1] == "--write-default" {
            let Some(path) = args.get(2) else {
                error!("--write-default에는 저장 경로가 필요합니다");
                println!("사용법: {} --write-default <경로>", args[0]);
                return;
            };

            let config = EngineConfig::default();
            match ConfigLoader::save_to_file(&config, &PathBuf::from(path), ConfigFormat::Auto) {
                Ok(()) => println!("기본 설정 저장 완료: {}", path),
                Err(e) => {
                    error!("기본 설정 저장 실패: {}", e);
                    println!("오류: {}", e);
                }
            }
            return;
        }

        debug!("사용자 지정 설정 파일 사용: {}", args[1]);
        PathBuf::from(&args[1])
    } else {
        debug!("기본 설정 파일 경로 사용");
        default_config_path().to_path_buf()
    };

    if !config_path.exists() {
        warn!("설정 파일이 존재하지 않습니다: {}", config_path.display());
        println!(
            "경고: 설정 파일이 존재하지 않습니다: {}",
            config_path.display()
        );
        println!("기본 설정으로 계속합니다.");
        print_config(&EngineConfig::default());
        return;
    }

    info!("설정 파일: {}", config_path.display());

    match ConfigLoader::load_from_file::<EngineConfig>(&config_path, ConfigFormat::Auto) {
        Ok(config) => {
            println!("설정 로드 성공: {}", config_path.display());
            print_config(&config);
        }
        Err(e) => {
            error!("설정 로드 실패: {}", e);
            println!("설정 로드 실패: {}", e);
        }
    }
}

/// 엔진 설정 요약 출력
fn print_config(config: &EngineConfig) {
    println!("EMA 기간: {:?}", config.ema_periods);
    println!("RSI 기간: {}", config.rsi_period);
    println!(
        "볼린저 밴드: 기간 {}, 승수 {}",
        config.bband_period, config.bband_multiplier
    );
    println!(
        "MACD: {}/{}/{}",
        config.macd.short_period, config.macd.long_period, config.macd.signal_period
    );
    println!("스퀴즈 룩백: {}", config.squeeze_lookback);
    println!("룩어헤드: {}", config.lookahead);
    println!("데이터 부족 정책: {}", config.insufficient_data_policy);
}

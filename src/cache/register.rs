//! 缓存后端注册表
//!
//! 后端通过 [`declare_object_cache_plugin!`](crate::declare_object_cache_plugin) 在进程启动时写入，
//! 启动阶段按配置的 `cache.type` 取出构造器。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

// BTreeMap 使后端列表输出顺序稳定
static BACKENDS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

/// 注册缓存后端，同名后端后注册者覆盖先注册者
pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let name = name.into();
    match BACKENDS.write() {
        Ok(mut backends) => {
            backends.insert(name, constructor);
        }
        Err(poisoned) => {
            poisoned.into_inner().insert(name, constructor);
        }
    }
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    let backends = BACKENDS.read().unwrap_or_else(|p| p.into_inner());
    backends.get(name).cloned()
}

/// 已注册的后端名称
pub fn registered_backends() -> Vec<String> {
    let backends = BACKENDS.read().unwrap_or_else(|p| p.into_inner());
    backends.keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TkseError;

    #[test]
    fn test_builtin_backends_registered() {
        let names = registered_backends();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
    }

    #[actix_web::test]
    async fn test_unknown_backend_and_custom_registration() {
        assert!(get_object_cache_plugin("memcached").is_none());

        register_object_cache_plugin(
            "always-fails",
            Arc::new(|| {
                Box::pin(async {
                    Err::<Box<dyn ObjectCache>, _>(TkseError::cache_connection("offline"))
                })
            }),
        );

        let constructor = get_object_cache_plugin("always-fails").unwrap();
        let err = constructor().await.err().unwrap();
        assert!(matches!(err, TkseError::CacheConnection(_)));
    }
}

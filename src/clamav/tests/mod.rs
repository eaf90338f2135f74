// ClamAV 绑定集成测试
//
// 注意：这些测试需要系统安装 libclamav 和病毒签名库才能运行，
// 因此统一标记 #[ignore]。本地运行方式：
//
//   cargo test -- --ignored

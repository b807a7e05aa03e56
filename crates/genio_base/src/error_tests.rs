/* 📖 # Why are the error tests in a separate file?

Span traces record source line numbers. Keeping the tests out of error.rs means
edits to the error module do not shift the lines these tests look at.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{GenioError, GenioResult, IoResultExt, ResultExt};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;

    fn with_error_layer<R>(f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::registry().with(ErrorLayer::default());
        tracing::subscriber::with_default(subscriber, f)
    }

    #[test]
    fn test_error_from_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = GenioError::file_error("test.txt", io_err);

        match error.kind() {
            ErrorKind::FileError { path, .. } => {
                assert_eq!(path, &PathBuf::from("test.txt"));
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_error_from_message() {
        let error = GenioError::message("something went wrong");

        match error.kind() {
            ErrorKind::Message { message } => {
                assert_eq!(message, "something went wrong");
            }
            _ => panic!("Expected Message variant"),
        }
    }

    #[test]
    fn test_error_context_attachment() {
        let error = GenioError::message("original error")
            .context("first context")
            .context("second context");

        assert_eq!(error.get_context(), ["first context", "second context"]);
    }

    #[test]
    fn test_error_with_context_lazy_evaluation() {
        let mut called = false;
        let error = GenioError::message("error").with_context(|| {
            called = true;
            "lazy context".to_string()
        });

        assert!(called);
        assert_eq!(error.get_context()[0], "lazy context");
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = GenioError::message("root error")
            .context("first")
            .context("second")
            .context("third");
        assert_eq!(error.to_string(), "first: second: third: root error");
    }

    #[test]
    fn test_error_display_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let error = GenioError::file_error("/tmp/test.txt", io_err);
        assert_eq!(error.to_string(), "File error at /tmp/test.txt: not found");
    }

    #[test]
    fn test_error_display_resource_not_found() {
        let error = GenioError::new(ErrorKind::ResourceNotFound {
            root: PathBuf::from("resources"),
            resource: "testdata/missing.txt".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Resource 'testdata/missing.txt' not found under resources"
        );
    }

    #[test]
    fn test_error_source_file_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = GenioError::file_error("test.txt", io_err);
        assert_eq!(error.source().unwrap().to_string(), "access denied");
    }

    #[test]
    fn test_error_source_is_cause() {
        let error = GenioError::message("outer").caused_by(GenioError::message("inner"));
        assert_eq!(error.source().unwrap().to_string(), "inner");
        assert_eq!(error.cause().unwrap().to_string(), "inner");
    }

    #[test]
    fn test_error_root_cause_follows_chain() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "disk gone");
        let error = GenioError::message("outer")
            .caused_by(GenioError::file_error("data.bin", io_err));
        assert_eq!(error.root_cause().to_string(), "disk gone");
    }

    #[test]
    fn test_error_root_cause_message() {
        let error = GenioError::message("test");
        assert_eq!(error.root_cause().to_string(), "test");
    }

    #[test]
    fn test_result_ext_context_error() {
        let result: GenioResult<i32> = Err(Box::new(GenioError::message("original")));
        let err = result.context("operation failed").unwrap_err();
        assert_eq!(err.to_string(), "operation failed: original");
    }

    #[test]
    fn test_result_ext_chaining() {
        let result: GenioResult<i32> = Err(Box::new(GenioError::message("root")));
        let err = result
            .context("step 1")
            .context("step 2")
            .with_context(|| "step 3".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: step 3: root");
    }

    #[test]
    fn test_result_ext_success_untouched() {
        let result: GenioResult<i32> = Ok(42);
        assert_eq!(result.context("unused").unwrap(), 42);
    }

    #[test]
    fn test_io_result_at_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.at_path("out/report.csv").unwrap_err();
        match err.kind() {
            ErrorKind::FileError { path, source } => {
                assert_eq!(path, &PathBuf::from("out/report.csv"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_err_and_bail_macros() {
        fn fails(block: usize) -> GenioResult<()> {
            crate::bail!("block size {} rejected", block);
        }
        let err = fails(7).unwrap_err();
        assert_eq!(err.to_string(), "block size 7 rejected");

        let built = crate::err!("plain {}", "message");
        assert_eq!(built.to_string(), "plain message");
    }

    #[test]
    fn test_debug_tree_without_trace() {
        let error = GenioError::message("something went wrong")
            .context("during file processing")
            .context("in demo run");

        expect![[r#"
            something went wrong
            ├─ during file processing
            └─ in demo run
        "#]]
        .assert_eq(&format!("{:?}", error));
    }

    #[test]
    fn test_debug_nested_causes() {
        let error_1 = GenioError::message("error 1").context("context 1");
        let error_2 = GenioError::message("error 2")
            .context("context 2")
            .caused_by(error_1);
        let error_3 = GenioError::message("error 3")
            .context("context 3")
            .caused_by(error_2);

        expect![[r#"
            error 3
            ├─ context 3
            └─ cause: error 2
               ├─ context 2
               └─ cause: error 1
                  └─ context 1
        "#]]
        .assert_eq(&format!("{:?}", error_3));
    }

    #[test]
    fn test_spantrace_captured_with_error_layer() {
        let debug = with_error_layer(|| {
            let read_span = span!(tracing::Level::DEBUG, "read_pass", block = 3);
            let _guard = read_span.enter();
            format!("{:?}", GenioError::message("short read"))
        });

        assert!(debug.starts_with("short read\n"));
        assert!(debug.contains("Trace:"));
        assert!(debug.contains("read_pass"));
        assert!(debug.contains("block=3"));
    }

    #[test]
    fn test_spantrace_absent_without_subscriber() {
        let debug = format!("{:?}", GenioError::message("no spans"));
        assert_eq!(debug, "no spans\n");
    }
}

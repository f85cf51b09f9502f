use bytes::Bytes;
use http::{header, Request, Response};

/// A body printed by a benchmark, with the media type it is sent as.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    content_type: &'static str,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, content_type: &'static str, file: TestFile) -> Self {
        Self { name, content_type, file }
    }

    pub fn json(name: &'static str, file: TestFile) -> Self {
        Self::new(name, "application/json", file)
    }

    pub fn text(name: &'static str, file: TestFile) -> Self {
        Self::new(name, "text/plain; charset=utf-8", file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.file.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.content.is_empty()
    }

    /// A request posting the fixture.
    pub fn request(&self) -> Request<Bytes> {
        Request::post("http://api.example.com/v1/items?limit=100")
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, "bencher")
            .header(header::AUTHORIZATION, "Bearer 0123456789abcdef")
            .body(Bytes::from_static(self.file.content.as_bytes()))
            .expect("fixture request should be valid")
    }

    /// A response returning the fixture.
    pub fn response(&self) -> Response<Bytes> {
        Response::builder()
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::SET_COOKIE, "session=abcdef; Path=/; HttpOnly")
            .body(Bytes::from_static(self.file.content.as_bytes()))
            .expect("fixture response should be valid")
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

/// text/event-stream 的增量解析器，只處理 data 欄位。
/// chunk 可能在任何位元組切斷，未完成的行留在 buffer 等下一個 chunk。
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// 回傳這個 chunk 完成的事件 data
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        // 行尾可以是 CRLF、LF 或單獨的 CR
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n' || *b == b'\r') {
            let terminator = if self.buffer[pos] == b'\r' {
                match self.buffer.get(pos + 1) {
                    Some(b'\n') => 2,
                    Some(_) => 1,
                    // CRLF 可能被切在兩個 chunk 之間
                    None => break,
                }
            } else {
                1
            };

            let raw: Vec<u8> = self.buffer.drain(..pos + terminator).collect();
            let line = String::from_utf8_lossy(&raw[..pos]).into_owned();
            self.process_line(&line, &mut events);
        }

        events
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if !self.data_lines.is_empty() {
                events.push(self.data_lines.join("\n"));
                self.data_lines.clear();
            }
            return;
        }

        if line.starts_with(':') {
            return;
        }

        // 沒有冒號時整行是欄位名稱，值為空字串
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }
}

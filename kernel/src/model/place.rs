// 外部 API から取得した写真の本体
#[derive(Debug)]
pub struct PlacePhoto {
    pub content_type: String,
    pub data: Vec<u8>,
}

//! Sample index documents.

use serde_json::{Value, json};

/// A two-category master index.
pub fn master() -> Value {
    json!([
        {
            "moduleName": "default",
            "category": "GENERATION TYPE",
            "title": "Image",
            "type": "image",
            "templates": [
                {
                    "name": "cat_generator",
                    "title": "Cat Generator",
                    "description": "Generate cats",
                    "mediaType": "image",
                    "mediaSubtype": "webp",
                    "tags": ["image"],
                    "models": ["Flux"],
                    "date": "2025-03-01",
                    "size": 1.5
                },
                {
                    "name": "upscale",
                    "title": "Upscale",
                    "description": "Make it bigger",
                    "mediaType": "image",
                    "mediaSubtype": "webp",
                    "tags": ["image", "upscale"],
                    "models": ["ESRGAN"],
                    "date": "2025-02-11",
                    "size": 0.4
                }
            ]
        },
        {
            "moduleName": "default",
            "category": "GENERATION TYPE",
            "title": "Video",
            "type": "video",
            "templates": [
                {
                    "name": "clip",
                    "title": "Clip",
                    "description": "Short video",
                    "mediaType": "image",
                    "mediaSubtype": "webp",
                    "tags": ["video"],
                    "models": ["Wan"],
                    "date": "2025-04-20",
                    "size": 12.0
                }
            ]
        }
    ])
}

/// A Chinese translation of an older master: `cat_generator` has a stale
/// size and no tags, `upscale` is missing, `legacy_tool` was dropped from
/// the master and the video category does not exist yet.
pub fn derived_zh() -> Value {
    json!([
        {
            "moduleName": "default",
            "category": "GENERATION TYPE",
            "title": "图像",
            "type": "image",
            "templates": [
                {
                    "name": "cat_generator",
                    "title": "猫咪生成器",
                    "description": "生成猫咪",
                    "mediaType": "image",
                    "mediaSubtype": "webp",
                    "models": ["Flux"],
                    "date": "2025-03-01",
                    "size": 1.2
                },
                {
                    "name": "legacy_tool",
                    "title": "旧工具",
                    "mediaType": "image",
                    "size": 0.1
                }
            ]
        }
    ])
}

use roxmltree::{Document, Node, NodeId};
use std::collections::HashMap;

/// JMeter 用“元素 + 紧随其后的 hashTree 兄弟节点”表示父子关系
pub const HASH_TREE: &str = "hashTree";

/// 元素到其子节点容器（hashTree）的索引
///
/// 每个文档只构建一次，之后按元素 id 直接查找，避免反复扫描兄弟列表
#[derive(Debug, Default)]
pub struct TreePairIndex {
    pairs: HashMap<NodeId, NodeId>,
}

impl TreePairIndex {
    /// 遍历整棵树，记录每个元素与其后紧邻的 hashTree
    pub fn build(doc: &Document<'_>) -> Self {
        let mut pairs = HashMap::new();

        for parent in doc.descendants().filter(|n| n.is_element()) {
            // 只看元素节点，空白文本不参与配对
            let children: Vec<Node<'_, '_>> = parent.children().filter(|n| n.is_element()).collect();
            for window in children.windows(2) {
                let (element, next) = (window[0], window[1]);
                if !element.has_tag_name(HASH_TREE) && next.has_tag_name(HASH_TREE) {
                    pairs.insert(element.id(), next.id());
                }
            }
        }

        Self { pairs }
    }

    /// 获取元素的子节点容器
    pub fn children_of<'a, 'input>(
        &self,
        doc: &'a Document<'input>,
        element: Node<'a, 'input>,
    ) -> Option<Node<'a, 'input>> {
        self.pairs.get(&element.id()).and_then(|id| doc.get_node(*id))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
